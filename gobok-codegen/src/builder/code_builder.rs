//! Tab-indented source text assembly.

use super::{CodeFragment, Renderable};

/// Chained construction of Go source text.
///
/// Every method consumes and returns the builder; indentation is one tab per
/// level, as `gofmt` writes it.
///
/// ```
/// use gobok_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::new()
///     .comment("Version is the current release.")
///     .line("const Version = \"1.0\"")
///     .blank()
///     .block("func main() {", "}", |b| b.line("println(Version)"))
///     .build();
///
/// assert_eq!(
///     code,
///     "// Version is the current release.\nconst Version = \"1.0\"\n\nfunc main() {\n\tprintln(Version)\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    depth: usize,
    buf: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line at the current depth.
    pub fn line(mut self, s: &str) -> Self {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    /// An empty line, never indented.
    pub fn blank(mut self) -> Self {
        self.buf.push('\n');
        self
    }

    /// A `//` comment; an empty `text` gives a bare `//`.
    pub fn comment(self, text: &str) -> Self {
        if text.is_empty() {
            self.line("//")
        } else {
            self.line(&format!("// {text}"))
        }
    }

    /// `open`, then whatever `body` adds one level deeper, then `close`.
    pub fn block<F>(mut self, open: &str, close: &str, body: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self = self.line(open);
        self.depth += 1;
        self = body(self);
        self.depth -= 1;
        self.line(close)
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Apply `f` once per item.
    pub fn each<T, I, F>(self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        items.into_iter().fold(self, f)
    }

    pub fn fragment(self, fragment: CodeFragment) -> Self {
        match fragment {
            CodeFragment::Line(s) => self.line(&s),
            CodeFragment::Blank => self.blank(),
            CodeFragment::Comment(text) => self.comment(&text),
            CodeFragment::Block { open, body, close } => {
                self.block(&open, close, |b| b.fragments(body))
            }
        }
    }

    pub fn fragments(self, fragments: Vec<CodeFragment>) -> Self {
        fragments.into_iter().fold(self, Self::fragment)
    }

    /// Lay out a declaration at the current depth.
    pub fn emit(self, node: &impl Renderable) -> Self {
        self.fragments(node.to_fragments())
    }

    pub fn build(self) -> String {
        self.buf
    }
}
