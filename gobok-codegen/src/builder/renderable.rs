//! Declarations as fragments of Go source.
//!
//! Declarations describe themselves as fragments; [`CodeBuilder`] lays the
//! fragments out with tab indentation.
//!
//! [`CodeBuilder`]: super::CodeBuilder

/// One piece of generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// A single line at the current depth.
    Line(String),
    /// An empty line.
    Blank,
    /// A `//` comment line.
    Comment(String),
    /// An opening line, a body one level deeper, and a closing line.
    Block {
        open: String,
        body: Vec<CodeFragment>,
        close: &'static str,
    },
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn comment(s: impl Into<String>) -> Self {
        Self::Comment(s.into())
    }

    /// `open` ends in `{`; the block closes with `}`.
    pub fn braced(open: impl Into<String>, body: Vec<CodeFragment>) -> Self {
        Self::Block {
            open: open.into(),
            body,
            close: "}",
        }
    }

    /// `open` ends in `(`; the block closes with `)`, as in `import ( ... )`.
    pub fn parenthesized(open: impl Into<String>, body: Vec<CodeFragment>) -> Self {
        Self::Block {
            open: open.into(),
            body,
            close: ")",
        }
    }
}

/// A declaration that can describe itself as code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_constructors() {
        assert_eq!(
            CodeFragment::braced("func f() {", vec![]),
            CodeFragment::Block {
                open: "func f() {".to_string(),
                body: vec![],
                close: "}",
            }
        );
        let import = CodeFragment::parenthesized("import (", vec![CodeFragment::line("\"os\"")]);
        assert!(matches!(import, CodeFragment::Block { close: ")", .. }));
    }
}
