//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - Chained assembly of tab-indented source
//! - [`CodeFragment`] - Intermediate representation for code pieces
//! - [`Renderable`] - Trait for declarations that describe themselves as fragments

mod code_builder;
mod renderable;

pub use code_builder::CodeBuilder;
pub use renderable::{CodeFragment, Renderable};
