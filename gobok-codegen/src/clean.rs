//! Removal of output files left behind by directories that no longer
//! declare annotated types.

use std::{fs, path::PathBuf};

use gobok_core::is_generated;
use tracing::{info, warn};

use crate::{
    diagnostic::{Diagnostic, Phase},
    generator::Scan,
};

/// Result of a clean run.
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Stale generated files, deleted unless this was a dry run.
    pub deleted: Vec<PathBuf>,
    /// Files named like the output but not written by gobok.
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Delete stale output files found by `scan`.
///
/// An output is stale when its directory contributed no structure. Files
/// without the generated header are left alone, as are directories where a
/// source failed to parse.
pub fn clean(scan: &Scan, dry_run: bool) -> CleanResult {
    let mut result = CleanResult::default();

    for path in &scan.outputs {
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        if scan.context.unit(&dir).is_some() || scan.context.dir_has_errors(&dir) {
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                result.diagnostics.push(
                    Diagnostic::error(Phase::Write, format!("cannot read file: {err}"))
                        .at(path.display().to_string()),
                );
                continue;
            }
        };
        if !is_generated(&content) {
            result.skipped.push(path.clone());
            continue;
        }

        if dry_run {
            result.deleted.push(path.clone());
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted stale output");
                result.deleted.push(path.clone());
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "delete failed");
                result.diagnostics.push(
                    Diagnostic::error(Phase::Write, format!("cannot delete file: {err}"))
                        .at(path.display().to_string()),
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use gobok_core::{Config, generated_header};
    use tempfile::TempDir;

    use super::*;
    use crate::generator::scan;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let generated = format!("{}\n\npackage x\n", generated_header());

        // Still annotated: kept.
        write(root, "live/a.go", "package live\n\n//gobok:builder\ntype A struct{ X int }\n");
        write(root, "live/gobok.go", &generated);
        // Annotation removed: stale.
        write(root, "stale/a.go", "package stale\n\ntype A struct{ X int }\n");
        write(root, "stale/gobok.go", &generated);
        // Hand-written file with the same name.
        write(root, "manual/gobok.go", "package manual\n");
        // Unparseable source: cannot tell, kept.
        write(root, "broken/a.go", "package broken\n\ntype A struct {\n");
        write(root, "broken/gobok.go", &generated);
        temp
    }

    #[test]
    fn test_clean_deletes_only_stale_generated_files() {
        let temp = fixture();
        let root = temp.path();
        let scan = scan(&[root.to_path_buf()], &Config::default());

        let result = clean(&scan, false);

        assert_eq!(result.deleted, vec![root.join("stale").join("gobok.go")]);
        assert_eq!(result.skipped, vec![root.join("manual").join("gobok.go")]);
        assert!(result.diagnostics.is_empty());
        assert!(!root.join("stale/gobok.go").exists());
        assert!(root.join("live/gobok.go").exists());
        assert!(root.join("manual/gobok.go").exists());
        assert!(root.join("broken/gobok.go").exists());
    }

    #[test]
    fn test_clean_dry_run_keeps_files() {
        let temp = fixture();
        let root = temp.path();
        let scan = scan(&[root.to_path_buf()], &Config::default());

        let result = clean(&scan, true);

        assert_eq!(result.deleted, vec![root.join("stale").join("gobok.go")]);
        assert!(root.join("stale/gobok.go").exists());
    }
}
