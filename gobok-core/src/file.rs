use std::path::{Path, PathBuf};

use eyre::Result;

/// Prefix of the first line of every file gobok writes.
pub const GENERATED_MARKER: &str = "// Code generated by gobok";

/// The full header line, following the Go convention for generated files.
pub fn generated_header() -> String {
    format!(
        "{GENERATED_MARKER} v{}. DO NOT EDIT.",
        env!("CARGO_PKG_VERSION")
    )
}

/// Whether `content` was produced by gobok (of any version).
pub fn is_generated(content: &str) -> bool {
    content
        .lines()
        .next()
        .is_some_and(|line| line.starts_with(GENERATED_MARKER) && line.ends_with("DO NOT EDIT."))
}

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Render the file content
    fn render(&self) -> String;
}

/// Write `content` in full, reporting whether the bytes on disk changed.
fn write_file(path: &Path, content: &str) -> Result<WriteResult> {
    let unchanged = std::fs::read(path).is_ok_and(|existing| existing == content.as_bytes());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(if unchanged {
        WriteResult::Unchanged
    } else {
        WriteResult::Written
    })
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was created or its content changed
    Written,
    /// File was rewritten with identical content
    Unchanged,
}

/// A file ready to be written: a path and its final content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn write(&self) -> Result<WriteResult> {
        write_file(&self.path, &self.content)
    }
}
