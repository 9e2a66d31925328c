//! Generate operation - scan sources and write output files.

use std::path::PathBuf;

use gobok_codegen::{Formatter, Generator, scan};
use gobok_core::Config;
use tracing::debug;

use super::render_parse_failures;
use crate::reports::{GenerateReport, GenerationResult, PreviewResult, WrittenResult};

/// Options for the generate operation.
pub struct GenerateOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Whether to skip the formatter.
    pub no_format: bool,
}

/// Execute the generate operation.
///
/// Scans every root, then renders one file per directory with annotated
/// structs. Problems are reported as diagnostics; nothing here aborts.
pub fn generate(roots: &[PathBuf], config: &Config, opts: GenerateOptions) -> GenerateReport {
    debug!(?roots, dry_run = opts.dry_run, "generate");
    let mut scan = scan(roots, config);
    let parse_errors = render_parse_failures(&mut scan.context);

    let formatter = Formatter::from_config(config, opts.no_format);
    let generator = Generator::new(&scan.context, config, formatter);
    let mut diagnostics = scan.context.diagnostics().to_vec();

    let result = if opts.dry_run {
        let (files, preview_diagnostics) = generator.preview();
        diagnostics.extend(preview_diagnostics);
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let generated = generator.generate();
        diagnostics.extend(generated.diagnostics);
        GenerationResult::Written(WrittenResult {
            written: generated.written,
            unchanged: generated.unchanged,
        })
    };

    GenerateReport {
        files_scanned: scan.context.files_scanned(),
        structure_count: scan.context.structure_count(),
        diagnostics,
        parse_errors,
        result,
    }
}
