//! Check operation - scan and report without writing.

use std::path::PathBuf;

use gobok_codegen::scan;
use gobok_core::Config;

use super::render_parse_failures;
use crate::reports::{CheckReport, UnitSummary};

/// Execute the check operation.
pub fn check(roots: &[PathBuf], config: &Config) -> CheckReport {
    let mut scan = scan(roots, config);
    let parse_errors = render_parse_failures(&mut scan.context);

    CheckReport {
        files_scanned: scan.context.files_scanned(),
        units: scan.context.units().map(UnitSummary::from).collect(),
        diagnostics: scan.context.diagnostics().to_vec(),
        parse_errors,
    }
}
