//! Declaration extraction and Go code emission for gobok.
//!
//! A run has two phases. [`scan`] walks the roots, parses every candidate
//! file and fills a [`GenerationContext`] with one [`AggregateUnit`] per
//! directory. [`Generator`] then renders each unit into a single output file.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`discovery`] - Walking roots for candidate sources and previous outputs
//! - [`extract`] - Marker scanning and structure records
//! - [`imports`] - Qualifier to import path resolution
//! - [`aggregate`] - Per-directory units and the run context
//! - [`emit`] - Builder and constructor rendering
//! - [`format`] - External formatter invocation
//! - [`generator`] - Scan and write phases
//! - [`clean`] - Stale output removal

pub mod aggregate;
pub mod builder;
pub mod clean;
pub mod diagnostic;
pub mod discovery;
pub mod emit;
pub mod extract;
pub mod format;
pub mod generator;
pub mod imports;

pub use aggregate::{AggregateUnit, GenerationContext, ParseFailure};
pub use clean::{CleanResult, clean};
pub use diagnostic::{Diagnostic, Phase, Severity};
pub use discovery::{Discovered, Discovery};
pub use emit::GoFile;
pub use extract::{Extraction, FieldRecord, Markers, StructureRecord, extract};
pub use format::Formatter;
pub use generator::{GenerateResult, Generator, PreviewFile, Scan, scan};
pub use imports::{ImportEntry, ImportSet};
