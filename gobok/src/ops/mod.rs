//! Core operations.
//!
//! This module contains the business logic for gobok commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod clean;
pub mod generate;

use gobok_codegen::GenerationContext;

pub use check::check;
pub use clean::clean;
pub use generate::generate;

/// Render every parse failure with its source snippet.
///
/// Takes the failures out of the context; their plain diagnostics stay.
fn render_parse_failures(context: &mut GenerationContext) -> Vec<String> {
    context
        .take_parse_failures()
        .into_iter()
        .map(|failure| format!("{:?}", miette::Report::new(*failure.error)))
        .collect()
}
