//! Core utilities and types for the gobok generator.
//!
//! This crate provides file writing, naming helpers and configuration
//! shared by the code generator and the command-line tool.

mod config;
mod file;
mod naming;

// Configuration
pub use config::{CONFIG_FILE, Config, DEFAULT_FORMATTER, DEFAULT_OUTPUT_FILE};
// File operations
pub use file::{File, GENERATED_MARKER, GeneratedFile, WriteResult, generated_header, is_generated};
// String utilities
pub use naming::{to_lower_camel, upper_first};
