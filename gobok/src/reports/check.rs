//! Check command report data structures.

use std::path::PathBuf;

use gobok_codegen::{AggregateUnit, Diagnostic, diagnostic};

use super::{
    generate::plural,
    output::{Output, Report, render_diagnostics},
};

/// Report data from a scan without writes.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of source files scanned.
    pub files_scanned: usize,
    /// Directories that would get an output file.
    pub units: Vec<UnitSummary>,
    /// All scan diagnostics, including info messages.
    pub diagnostics: Vec<Diagnostic>,
    /// Parse errors rendered with their source snippet.
    pub parse_errors: Vec<String>,
}

/// One output directory and what it would contain.
#[derive(Debug)]
pub struct UnitSummary {
    pub dir: PathBuf,
    pub package: String,
    pub structures: Vec<StructureSummary>,
}

#[derive(Debug)]
pub struct StructureSummary {
    pub name: String,
    pub field_count: usize,
    /// Builder type name, if requested.
    pub builder: Option<String>,
    /// Constructor function name, if requested.
    pub constructor: Option<String>,
}

impl From<&AggregateUnit> for UnitSummary {
    fn from(unit: &AggregateUnit) -> Self {
        Self {
            dir: unit.dir.clone(),
            package: unit.package.clone(),
            structures: unit
                .structures
                .iter()
                .map(|s| StructureSummary {
                    name: s.name.clone(),
                    field_count: s.fields.len(),
                    builder: s.builder.then(|| s.builder_name()),
                    constructor: s.constructor.then(|| s.constructor_fn_name()),
                })
                .collect(),
        }
    }
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }

    fn structure_count(&self) -> usize {
        self.units.iter().map(|u| u.structures.len()).sum()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for rendered in &self.parse_errors {
            out.error_report(rendered);
        }
        render_diagnostics(out, &self.diagnostics, true);

        for unit in &self.units {
            out.section(&format!("{} (package {})", unit.dir.display(), unit.package));
            for s in &unit.structures {
                let generated: Vec<&str> = [s.builder.as_deref(), s.constructor.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                out.list_item(&format!(
                    "{} ({} field{}): {}",
                    s.name,
                    s.field_count,
                    plural(s.field_count),
                    generated.join(", ")
                ));
            }
            out.newline();
        }

        let structures = self.structure_count();
        let summary = format!(
            "{} annotated struct{} in {} director{} ({} file{} scanned)",
            structures,
            plural(structures),
            self.units.len(),
            if self.units.len() == 1 { "y" } else { "ies" },
            self.files_scanned,
            plural(self.files_scanned)
        );
        if self.has_errors() {
            out.preformatted(&summary);
        } else {
            out.preformatted(&format!("✓ {summary}"));
        }
    }
}
