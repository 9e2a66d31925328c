//! Clean operation - remove stale generated files.

use std::path::PathBuf;

use gobok_codegen::{Severity, clean as clean_outputs, scan};
use gobok_core::Config;

use super::render_parse_failures;
use crate::reports::CleanReport;

/// Execute the clean operation.
///
/// Only scan errors are reported; warnings about the remaining structures
/// are the business of `generate`.
pub fn clean(roots: &[PathBuf], config: &Config, dry_run: bool) -> CleanReport {
    let mut scan = scan(roots, config);
    let parse_errors = render_parse_failures(&mut scan.context);
    let result = clean_outputs(&scan, dry_run);

    let mut diagnostics: Vec<_> = scan
        .context
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .cloned()
        .collect();
    diagnostics.extend(result.diagnostics);

    CleanReport {
        dry_run,
        deleted: result.deleted,
        skipped: result.skipped,
        diagnostics,
        parse_errors,
    }
}
