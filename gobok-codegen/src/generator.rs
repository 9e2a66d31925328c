//! The scan and emission phases of a generation run.

use std::path::PathBuf;

use gobok_core::{Config, File, GeneratedFile, WriteResult};
use tracing::{info, warn};

use crate::{
    aggregate::{AggregateUnit, GenerationContext},
    diagnostic::{self, Diagnostic, Phase},
    discovery::Discovery,
    emit::GoFile,
    format::Formatter,
};

/// Everything learned from scanning the roots.
#[derive(Debug)]
pub struct Scan {
    pub context: GenerationContext,
    /// Output files already present under the roots.
    pub outputs: Vec<PathBuf>,
}

/// Discover and scan every source under `roots`.
///
/// Discovery failures are recorded in the returned context alongside parse
/// and extraction diagnostics.
pub fn scan(roots: &[PathBuf], config: &Config) -> Scan {
    let discovered = Discovery::new(config).run(roots);
    let mut context = GenerationContext::new(config.strict);
    for diagnostic in discovered.diagnostics {
        context.push_diagnostic(diagnostic);
    }
    for source in &discovered.sources {
        context.scan_file(source);
    }
    info!(
        files = context.files_scanned(),
        structures = context.structure_count(),
        units = context.unit_count(),
        "scan complete"
    );
    Scan {
        context,
        outputs: discovered.outputs,
    }
}

/// A rendered output file that was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    pub path: PathBuf,
    pub content: String,
}

/// Result of writing every unit.
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Files created or changed.
    pub written: Vec<PathBuf>,
    /// Files rewritten with identical content.
    pub unchanged: Vec<PathBuf>,
    /// Formatting and write problems. Scan diagnostics stay in the context.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerateResult {
    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }
}

/// Renders, formats and writes one file per aggregate unit.
pub struct Generator<'a> {
    context: &'a GenerationContext,
    output_file: &'a str,
    formatter: Formatter,
}

impl<'a> Generator<'a> {
    pub fn new(context: &'a GenerationContext, config: &'a Config, formatter: Formatter) -> Self {
        Self {
            context,
            output_file: &config.output_file,
            formatter,
        }
    }

    /// Render every unit without touching the filesystem.
    pub fn preview(&self) -> (Vec<PreviewFile>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let files = self
            .context
            .units()
            .map(|unit| {
                let file = self.render_unit(unit, &mut diagnostics);
                PreviewFile {
                    path: file.path().to_path_buf(),
                    content: file.content().to_string(),
                }
            })
            .collect();
        (files, diagnostics)
    }

    /// Write every unit. A failure for one directory does not stop the rest.
    pub fn generate(&self) -> GenerateResult {
        let mut result = GenerateResult::default();
        for unit in self.context.units() {
            let file = self.render_unit(unit, &mut result.diagnostics);
            let path = file.path().to_path_buf();
            match file.write() {
                Ok(WriteResult::Written) => {
                    info!(path = %path.display(), "wrote");
                    result.written.push(path);
                }
                Ok(WriteResult::Unchanged) => result.unchanged.push(path),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "write failed");
                    result.diagnostics.push(
                        Diagnostic::error(Phase::Write, format!("cannot write file: {err}"))
                            .at(path.display().to_string()),
                    );
                }
            }
        }
        result
    }

    fn render_unit(&self, unit: &AggregateUnit, diagnostics: &mut Vec<Diagnostic>) -> File {
        let go_file = GoFile::new(unit, self.output_file);
        let path = go_file.output_path();
        let rendered = go_file.render();
        let content = match self.formatter.format(&rendered) {
            Ok(formatted) => formatted,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "formatting failed");
                diagnostics.push(
                    Diagnostic::warning(
                        Phase::Format,
                        format!("formatting failed, writing unformatted output: {err:#}"),
                    )
                    .at(path.display().to_string()),
                );
                rendered
            }
        };
        File::new(path, content)
    }
}
