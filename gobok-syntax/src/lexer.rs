//! Go lexer with automatic semicolon insertion.
//!
//! Produces the full token stream of a file. Comments are not tokens; instead
//! every token carries the comment group that ends on the line directly above
//! it, which is how declarations find their doc comments.

use crate::{
    Result,
    error::SourceContext,
    token::{Comment, Keyword, Span, Token, TokenKind},
};

const OPERATORS: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Ellipsis),
    ("<<=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    ("&^=", TokenKind::Operator),
    ("<-", TokenKind::Arrow),
    ("++", TokenKind::IncDec),
    ("--", TokenKind::IncDec),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    (":=", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("&^", TokenKind::Operator),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (".", TokenKind::Dot),
    ("*", TokenKind::Star),
    ("=", TokenKind::Assign),
    ("~", TokenKind::Tilde),
    ("|", TokenKind::Pipe),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("&", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("!", TokenKind::Operator),
    (":", TokenKind::Operator),
];

/// Tokenize a whole source file.
pub fn tokenize(ctx: &SourceContext<'_>) -> Result<Vec<Token>> {
    Lexer::new(ctx).run()
}

struct Lexer<'a> {
    ctx: &'a SourceContext<'a>,
    src: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    pending: Vec<Comment>,
    last_token_line: Option<usize>,
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    fn new(ctx: &'a SourceContext<'a>) -> Self {
        Self {
            ctx,
            src: ctx.src(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            pending: Vec::new(),
            last_token_line: None,
            insert_semi: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    if self.insert_semi {
                        self.push_implicit_semicolon();
                    }
                    self.pos += 1;
                    self.line += 1;
                }
                ' ' | '\t' | '\r' | '\u{feff}' => self.pos += c.len_utf8(),
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment()?,
                _ => self.token()?,
            }
        }

        if self.insert_semi {
            self.push_implicit_semicolon();
        }
        let doc = self.take_doc(self.line + 1);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.pos, self.pos),
            line: self.line,
            doc,
        });
        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn push_implicit_semicolon(&mut self) {
        self.tokens.push(Token {
            kind: TokenKind::Semicolon,
            span: Span::new(self.pos, self.pos),
            line: self.line,
            doc: Vec::new(),
        });
        self.insert_semi = false;
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let end = self.rest().find('\n').map_or(self.src.len(), |i| start + i);
        self.pending.push(Comment {
            text: self.src[start..end].to_string(),
            span: Span::new(start, end),
            line: self.line,
            end_line: self.line,
            own_line: self.last_token_line != Some(self.line),
        });
        self.pos = end;
    }

    fn block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let Some(close) = self.rest()[2..].find("*/") else {
            return Err(self
                .ctx
                .lex_error("comment not terminated", Span::new(start, start + 2)));
        };
        let end = start + 2 + close + 2;
        let text = &self.src[start..end];
        let newlines = text.matches('\n').count();

        // A multi-line general comment acts like a newline.
        if newlines > 0 && self.insert_semi {
            self.push_implicit_semicolon();
        }

        self.pending.push(Comment {
            text: text.to_string(),
            span: Span::new(start, end),
            line: self.line,
            end_line: self.line + newlines,
            own_line: self.last_token_line != Some(self.line),
        });
        self.line += newlines;
        self.pos = end;
        Ok(())
    }

    fn token(&mut self) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        let c = self.peek().unwrap_or('\0');

        let kind = if c == '_' || c.is_alphabetic() {
            self.identifier()
        } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            self.number()
        } else if c == '"' {
            self.quoted('"', TokenKind::String)?
        } else if c == '\'' {
            self.quoted('\'', TokenKind::Char)?
        } else if c == '`' {
            self.raw_string()?
        } else {
            self.operator()?
        };

        let doc = self.take_doc(line);
        self.tokens.push(Token {
            kind,
            span: Span::new(start, self.pos),
            line,
            doc,
        });
        self.insert_semi = kind.ends_line();
        self.last_token_line = Some(self.line);
        Ok(())
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| *c == '_' || c.is_alphanumeric())
            .map(char::len_utf8)
            .sum();
        self.pos += len;
        match Keyword::from_ident(&self.src[start..self.pos]) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        }
    }

    fn number(&mut self) -> TokenKind {
        let start = self.pos;
        let rest = self.rest();
        let is_hex = rest.starts_with("0x") || rest.starts_with("0X");
        let mut prev = '\0';
        let mut len = 0;
        for ch in rest.chars() {
            let exponent_sign = (ch == '+' || ch == '-')
                && if is_hex {
                    matches!(prev, 'p' | 'P')
                } else {
                    matches!(prev, 'e' | 'E')
                };
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || exponent_sign {
                len += 1;
                prev = ch;
            } else {
                break;
            }
        }
        self.pos += len;

        let text = &self.src[start..self.pos];
        if text.ends_with('i') {
            TokenKind::Imag
        } else if text.contains('.')
            || (is_hex && text.contains(['p', 'P']))
            || (!is_hex && text.contains(['e', 'E']))
        {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn quoted(&mut self, quote: char, kind: TokenKind) -> Result<TokenKind> {
        let start = self.pos;
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '\n' => break,
                ch if ch == quote => {
                    self.pos = start + i + 1;
                    return Ok(kind);
                }
                _ => {}
            }
        }
        let what = if kind == TokenKind::String {
            "string literal not terminated"
        } else {
            "rune literal not terminated"
        };
        Err(self.ctx.lex_error(what, Span::new(start, start + 1)))
    }

    fn raw_string(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let Some(close) = self.rest()[1..].find('`') else {
            return Err(self
                .ctx
                .lex_error("raw string literal not terminated", Span::new(start, start + 1)));
        };
        let end = start + 1 + close + 1;
        self.line += self.src[start..end].matches('\n').count();
        self.pos = end;
        Ok(TokenKind::String)
    }

    fn operator(&mut self) -> Result<TokenKind> {
        let rest = self.rest();
        for (op, kind) in OPERATORS {
            if rest.starts_with(op) {
                self.pos += op.len();
                return Ok(*kind);
            }
        }
        let ch = rest.chars().next().unwrap_or('\0');
        Err(self.ctx.lex_error(
            format!("unexpected character '{ch}'"),
            Span::new(self.pos, self.pos + ch.len_utf8()),
        ))
    }

    /// Take the comment group that ends on the line directly above `line`.
    ///
    /// All pending comments are consumed; comments trailing a previous token
    /// or separated from `line` by a blank line are discarded.
    fn take_doc(&mut self, line: usize) -> Vec<Comment> {
        let mut pending = std::mem::take(&mut self.pending);
        let mut group_start = pending.len();
        for i in (0..pending.len()).rev() {
            let comment = &pending[i];
            if !comment.own_line {
                break;
            }
            let follows = match pending.get(i + 1) {
                Some(next) if i + 1 == group_start => comment.end_line + 1 >= next.line,
                _ => comment.end_line + 1 == line,
            };
            if !follows {
                break;
            }
            group_start = i;
        }
        pending.split_off(group_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let ctx = SourceContext::new(src, "test.go");
        tokenize(&ctx)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex(src: &str) -> Vec<Token> {
        let ctx = SourceContext::new(src, "test.go");
        tokenize(&ctx).unwrap()
    }

    #[test]
    fn test_semicolon_inserted_after_identifier() {
        assert_eq!(
            kinds("package main\n"),
            vec![
                TokenKind::Keyword(Keyword::Package),
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        assert_eq!(
            kinds("struct {\n}\n"),
            vec![
                TokenKind::Keyword(Keyword::Struct),
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_semicolon_at_eof_without_newline() {
        assert_eq!(
            kinds("x"),
            vec![TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn test_channel_operators() {
        assert_eq!(
            kinds("chan<- <-chan"),
            vec![
                TokenKind::Keyword(Keyword::Chan),
                TokenKind::Arrow,
                TokenKind::Arrow,
                TokenKind::Keyword(Keyword::Chan),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("1 0x1p-2 1.5e+3 2i 'a' \"s\" `raw`"),
            vec![
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Imag,
                TokenKind::Char,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let src = r#""a\"b""#;
        let tokens = lex(src);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(src), src);
    }

    #[test]
    fn test_raw_string_counts_lines() {
        let tokens = lex("`a\nb`\nx");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_doc_comment_attached() {
        let tokens = lex("// first\n//gobok:builder\ntype X struct{}");
        let doc: Vec<&str> = tokens[0].doc.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(doc, vec!["// first", "//gobok:builder"]);
    }

    #[test]
    fn test_doc_comment_separated_by_blank_line() {
        let tokens = lex("//gobok:builder\n\ntype X struct{}");
        assert!(tokens[0].doc.is_empty());
    }

    #[test]
    fn test_doc_comment_group_stops_at_blank_line() {
        let tokens = lex("// unrelated\n\n// Person doc\n//gobok:builder\ntype X int");
        let doc: Vec<&str> = tokens[0].doc.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(doc, vec!["// Person doc", "//gobok:builder"]);
    }

    #[test]
    fn test_trailing_comment_is_not_doc() {
        let tokens = lex("x int // trailing\ny int");
        let y = tokens
            .iter()
            .find(|t| t.line == 2 && t.kind == TokenKind::Ident)
            .unwrap();
        assert!(y.doc.is_empty());
    }

    #[test]
    fn test_block_comment_acts_as_newline() {
        assert_eq!(
            kinds("x /*\n*/ y"),
            vec![
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let ctx = SourceContext::new("\"abc\n", "test.go");
        let err = tokenize(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "string literal not terminated");
    }

    #[test]
    fn test_unexpected_character_is_error() {
        let ctx = SourceContext::new("type X @", "test.go");
        let err = tokenize(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "unexpected character '@'");
    }
}
