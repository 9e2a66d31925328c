//! Token and comment types produced by the lexer.

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Go keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    pub fn from_ident(s: &str) -> Option<Self> {
        let kw = match s {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        };
        Some(kw)
    }

    /// Keywords after which a newline terminates the statement.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::Break | Self::Continue | Self::Fallthrough | Self::Return
        )
    }
}

/// Returns true if `s` is a reserved Go keyword.
pub fn is_keyword(s: &str) -> bool {
    Keyword::from_ident(s).is_some()
}

/// Returns true if `s` is a valid Go identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric()) && !is_keyword(s)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword(Keyword),
    Int,
    Float,
    Imag,
    Char,
    String,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Star,
    Arrow,
    Ellipsis,
    Assign,
    Tilde,
    Pipe,
    /// `++` and `--`, which end a statement at a newline.
    IncDec,
    /// Any other operator; the parser never inspects these.
    Operator,
    /// Explicit `;` or a semicolon inserted at a newline.
    Semicolon,
    Eof,
}

impl TokenKind {
    /// Whether a newline directly after this token inserts a semicolon.
    pub(crate) fn ends_line(self) -> bool {
        match self {
            Self::Ident
            | Self::Int
            | Self::Float
            | Self::Imag
            | Self::Char
            | Self::String
            | Self::RParen
            | Self::RBracket
            | Self::RBrace
            | Self::IncDec => true,
            Self::Keyword(kw) => kw.ends_statement(),
            _ => false,
        }
    }
}

/// A `//` or `/* */` comment with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Full comment text including the `//` or `/*` delimiters.
    pub text: String,
    pub span: Span,
    pub line: usize,
    pub end_line: usize,
    /// True when no token precedes the comment on its first line.
    pub own_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
    /// The comment group ending on the line right above this token, if any.
    pub doc: Vec<Comment>,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        if self.kind == TokenKind::Semicolon && self.span.is_empty() {
            return ";";
        }
        &src[self.span.start..self.span.end]
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }
}
