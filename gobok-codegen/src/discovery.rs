//! Candidate file discovery.

use std::{
    collections::HashSet,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use gobok_core::Config;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::diagnostic::{Diagnostic, Phase};

/// Files found under the scanned roots.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Go sources to scan, in walk order.
    pub sources: Vec<PathBuf>,
    /// Existing output files (e.g. `gobok.go`).
    pub outputs: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks root paths and sorts files into sources and previous outputs.
///
/// Hidden directories, `vendor` and configured exclusions are not entered,
/// except when they are a root themselves.
pub struct Discovery<'a> {
    output_file: &'a str,
    exclude: &'a [String],
}

impl<'a> Discovery<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            output_file: &config.output_file,
            exclude: &config.exclude,
        }
    }

    pub fn run(&self, roots: &[PathBuf]) -> Discovered {
        let mut found = Discovered::default();
        let mut seen = HashSet::new();

        for root in roots {
            let walker = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !self.is_excluded_dir(e));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        found.diagnostics.push(walk_error(root, &err));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.into_path();
                let key = path.canonicalize().unwrap_or_else(|_| path.clone());
                if !seen.insert(key) {
                    continue;
                }
                match self.classify(&path) {
                    FileKind::Source => {
                        debug!(path = %path.display(), "found source");
                        found.sources.push(path);
                    }
                    FileKind::Output => found.outputs.push(path),
                    FileKind::Other => {}
                }
            }
        }

        found
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || name == "vendor" || self.exclude.iter().any(|e| *e == name)
    }

    fn classify(&self, path: &Path) -> FileKind {
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            return FileKind::Other;
        };
        if name == self.output_file {
            FileKind::Output
        } else if name.ends_with(".go") && !name.ends_with("_test.go") {
            FileKind::Source
        } else {
            FileKind::Other
        }
    }
}

enum FileKind {
    Source,
    Output,
    Other,
}

/// A failure on the root itself is an error; anything deeper only loses
/// that subtree.
fn walk_error(root: &Path, err: &walkdir::Error) -> Diagnostic {
    let path = err.path().unwrap_or(root);
    let message = match err.io_error() {
        Some(io) => format!("cannot read {}: {io}", path.display()),
        None => format!("cannot read {}: {err}", path.display()),
    };
    if err.depth() == 0 {
        Diagnostic::error(Phase::Discover, message).at(root.display().to_string())
    } else {
        warn!(path = %path.display(), "skipping unreadable path");
        Diagnostic::warning(Phase::Discover, message).at(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package x\n").unwrap();
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_filters_tests_outputs_and_excluded_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for rel in [
            "main.go",
            "main_test.go",
            "gobok.go",
            "README.md",
            "models/user.go",
            "models/gobok.go",
            "vendor/lib/lib.go",
            ".git/hooks/x.go",
            ".hidden/y.go",
            "testdata/fixture.go",
        ] {
            touch(root, rel);
        }

        let config = Config {
            exclude: vec!["testdata".to_string()],
            ..Config::default()
        };
        let found = Discovery::new(&config).run(&[root.to_path_buf()]);

        assert_eq!(relative(root, &found.sources), vec!["main.go", "models/user.go"]);
        assert_eq!(
            relative(root, &found.outputs),
            vec!["gobok.go", "models/gobok.go"]
        );
        assert!(found.diagnostics.is_empty());
    }

    #[test]
    fn test_hidden_root_is_still_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".config");
        touch(&root, "settings.go");

        let found = Discovery::new(&Config::default()).run(&[root.clone()]);
        assert_eq!(relative(&root, &found.sources), vec!["settings.go"]);
    }

    #[test]
    fn test_custom_output_file_name() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.go");
        touch(temp.path(), "zz_builders.go");

        let config = Config {
            output_file: "zz_builders.go".to_string(),
            ..Config::default()
        };
        let found = Discovery::new(&config).run(&[temp.path().to_path_buf()]);
        assert_eq!(relative(temp.path(), &found.sources), vec!["a.go"]);
        assert_eq!(relative(temp.path(), &found.outputs), vec!["zz_builders.go"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let found = Discovery::new(&Config::default()).run(&[missing]);
        assert!(found.sources.is_empty());
        assert_eq!(found.diagnostics.len(), 1);
        assert!(found.diagnostics[0].severity.is_error());
    }

    #[test]
    fn test_overlapping_roots_do_not_duplicate() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "models/user.go");

        let found = Discovery::new(&Config::default())
            .run(&[temp.path().to_path_buf(), temp.path().join("models")]);
        assert_eq!(found.sources.len(), 1);
    }
}
