//! Generate command report data structures.

use std::path::PathBuf;

use gobok_codegen::{Diagnostic, PreviewFile, diagnostic};

use super::output::{Output, Report, render_diagnostics};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of source files scanned.
    pub files_scanned: usize,

    /// Number of annotated structures found.
    pub structure_count: usize,

    /// Scan, format and write diagnostics, in that order.
    pub diagnostics: Vec<Diagnostic>,

    /// Parse errors rendered with their source snippet.
    pub parse_errors: Vec<String>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug, Default)]
pub struct WrittenResult {
    /// Files created or changed.
    pub written: Vec<PathBuf>,
    /// Files whose content was already up to date.
    pub unchanged: Vec<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

impl GenerateReport {
    /// Whether the run recorded any error diagnostic.
    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for rendered in &self.parse_errors {
            out.error_report(rendered);
        }
        render_diagnostics(out, &self.diagnostics, false);

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&format!(
            "Scanned {} file{}, found {} annotated struct{}",
            self.files_scanned,
            plural(self.files_scanned),
            self.structure_count,
            plural(self.structure_count)
        ));

        if !written.written.is_empty() {
            out.newline();
            out.section("Wrote");
            for path in &written.written {
                out.added_item(&path.display().to_string());
            }
        }

        if !written.unchanged.is_empty() {
            out.newline();
            out.key_value("Unchanged", &written.unchanged.len().to_string());
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path.display().to_string());
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} file{} would be generated",
            preview.files.len(),
            plural(preview.files.len())
        ));
    }
}

pub(super) fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
