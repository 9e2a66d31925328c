//! Per-directory aggregation of structure records.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use gobok_syntax::SourceFile;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    diagnostic::{self, Diagnostic, Phase},
    extract::{StructureRecord, extract},
    imports::ImportSet,
};

/// The structures and imports that go into one directory's output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateUnit {
    pub dir: PathBuf,
    /// Package of the first file that contributed a structure.
    pub package: String,
    /// In file-scan order, then declaration order.
    pub structures: Vec<StructureRecord>,
    pub imports: ImportSet,
}

/// A file that could not be parsed, kept for rich error rendering.
#[derive(Debug)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub error: Box<gobok_syntax::Error>,
}

/// State of one generation run.
///
/// Filled file by file during the scan phase and read in full afterwards.
#[derive(Debug, Default)]
pub struct GenerationContext {
    strict: bool,
    units: IndexMap<PathBuf, AggregateUnit>,
    diagnostics: Vec<Diagnostic>,
    parse_failures: Vec<ParseFailure>,
    /// Directories holding a file that failed to parse.
    error_dirs: HashSet<PathBuf>,
    files_scanned: usize,
}

impl GenerationContext {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Parse a file from disk and add its structures.
    pub fn scan_file(&mut self, path: &Path) {
        debug!(path = %path.display(), "scanning");
        match gobok_syntax::parse_file(path) {
            Ok(file) => self.add_file(path, &file),
            Err(error) => self.record_parse_failure(path, error),
        }
    }

    /// Parse source text as if it were the file at `path`.
    pub fn scan_source(&mut self, path: &Path, src: &str) {
        match gobok_syntax::parse_source(src, &path.display().to_string()) {
            Ok(file) => self.add_file(path, &file),
            Err(error) => self.record_parse_failure(path, error),
        }
    }

    /// Add the structures of an already parsed file.
    pub fn add_file(&mut self, path: &Path, file: &SourceFile) {
        self.files_scanned += 1;
        let extraction = extract(file, path, self.strict);
        self.diagnostics.extend(extraction.diagnostics);

        if extraction.structures.is_empty() {
            return;
        }

        let dir = parent_dir(path);
        let unit = self
            .units
            .entry(dir.clone())
            .or_insert_with(|| AggregateUnit {
                dir,
                package: file.package.clone(),
                structures: Vec::new(),
                imports: ImportSet::new(),
            });

        if unit.package != file.package {
            warn!(path = %path.display(), "package conflict");
            self.diagnostics.push(
                Diagnostic::error(
                    Phase::Aggregate,
                    format!(
                        "declares package `{}` but `{}` already uses package `{}`; file skipped",
                        file.package,
                        unit.dir.display(),
                        unit.package
                    ),
                )
                .at(path.display().to_string()),
            );
            return;
        }

        for record in extraction.structures {
            if let Some(first) = unit.structures.iter().find(|s| s.name == record.name) {
                self.diagnostics.push(
                    Diagnostic::warning(
                        Phase::Aggregate,
                        format!(
                            "duplicate struct `{}`; keeping the one in {}",
                            record.name,
                            first.source.display()
                        ),
                    )
                    .at(format!("{}:{}", path.display(), record.name)),
                );
                continue;
            }
            unit.imports.extend(record.imports.iter().cloned());
            unit.structures.push(record);
        }
    }

    fn record_parse_failure(&mut self, path: &Path, error: Box<gobok_syntax::Error>) {
        warn!(path = %path.display(), "failed to parse");
        self.files_scanned += 1;
        self.error_dirs.insert(parent_dir(path));
        self.diagnostics.push(
            Diagnostic::error(Phase::Parse, error.to_string()).at(path.display().to_string()),
        );
        self.parse_failures.push(ParseFailure {
            path: path.to_path_buf(),
            error,
        });
    }

    /// Record a diagnostic raised outside the scan (discovery, emission).
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Units in first-contribution order.
    pub fn units(&self) -> impl Iterator<Item = &AggregateUnit> {
        self.units.values()
    }

    pub fn unit(&self, dir: &Path) -> Option<&AggregateUnit> {
        self.units.get(dir)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn structure_count(&self) -> usize {
        self.units.values().map(|u| u.structures.len()).sum()
    }

    /// Whether some file in `dir` could not be parsed, so its structures are
    /// unknown.
    pub fn dir_has_errors(&self, dir: &Path) -> bool {
        self.error_dirs.contains(dir)
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }

    /// Take the parse failures, leaving their diagnostics in place.
    pub fn take_parse_failures(&mut self) -> Vec<ParseFailure> {
        std::mem::take(&mut self.parse_failures)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
