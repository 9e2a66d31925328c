//! Clean command report data structures.

use std::path::PathBuf;

use gobok_codegen::{Diagnostic, diagnostic};

use super::output::{Output, Report, render_diagnostics};

/// Report data from cleaning stale output files.
#[derive(Debug)]
pub struct CleanReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Deleted (or to be deleted) files.
    pub deleted: Vec<PathBuf>,
    /// Files with the output name that gobok did not write.
    pub skipped: Vec<PathBuf>,
    /// Scan errors and delete failures.
    pub diagnostics: Vec<Diagnostic>,
    /// Parse errors rendered with their source snippet.
    pub parse_errors: Vec<String>,
}

impl CleanReport {
    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }
}

impl Report for CleanReport {
    fn render(&self, out: &mut dyn Output) {
        for rendered in &self.parse_errors {
            out.error_report(rendered);
        }
        render_diagnostics(out, &self.diagnostics, false);

        if self.deleted.is_empty() && self.skipped.is_empty() {
            out.preformatted("No stale generated files found.");
            return;
        }

        if !self.deleted.is_empty() {
            if self.dry_run {
                out.section("Would delete");
            } else {
                out.section("Deleted");
            }
            for path in &self.deleted {
                out.removed_item(&path.display().to_string());
            }
        }

        if !self.skipped.is_empty() {
            out.newline();
            out.section("Skipped (not generated by gobok)");
            for path in &self.skipped {
                out.list_item(&format!("! {}", path.display()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_dry_run_heading() {
        let report = CleanReport {
            dry_run: true,
            deleted: vec![PathBuf::from("old/gobok.go")],
            skipped: vec![PathBuf::from("manual/gobok.go")],
            diagnostics: vec![],
            parse_errors: vec![],
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        insta::assert_snapshot!(out.stdout.join("\n"), @r"
        Would delete:
          - old/gobok.go

        Skipped (not generated by gobok):
          - ! manual/gobok.go
        ");
    }

    #[test]
    fn test_nothing_to_clean() {
        let report = CleanReport {
            dry_run: false,
            deleted: vec![],
            skipped: vec![],
            diagnostics: vec![],
            parse_errors: vec![],
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(out.stdout, vec!["No stale generated files found."]);
    }
}
