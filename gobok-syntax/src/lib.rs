//! Go source front end for gobok.
//!
//! Lexes and parses the parts of a Go file that matter for code generation:
//! the package clause, the import block and type declarations. Function,
//! variable and constant declarations are skipped without being parsed.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod ast;
mod error;
mod lexer;
mod parser;
mod serialize;
mod token;

pub use ast::*;
pub use error::{Error, Result, SourceContext};
pub use lexer::tokenize;
pub use parser::{parse_file, parse_source, parse_type_expr};
pub use serialize::{ANY_TYPE, TypeText, serialize};
pub use token::{Comment, Keyword, Span, Token, TokenKind, is_identifier, is_keyword};
