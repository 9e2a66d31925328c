//! Recursive-descent parser for Go file headers and type declarations.
//!
//! Function, variable and constant declarations are skipped by bracket
//! matching, so their bodies only need to lex, not parse.

use std::path::Path;

use crate::{
    Error, Result,
    ast::{
        ChanDir, FieldDecl, ImportSpec, InterfaceElem, ParamGroup, Signature, SourceFile,
        TypeDecl, TypeExpr,
    },
    error::SourceContext,
    lexer::tokenize,
    token::{Keyword, Span, Token, TokenKind},
};

/// Read and parse a Go source file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<SourceFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    parse_source(&content, &path.display().to_string())
}

/// Parse Go source text; `filename` is only used for error reporting.
pub fn parse_source(src: &str, filename: &str) -> Result<SourceFile> {
    let ctx = SourceContext::new(src, filename);
    let tokens = tokenize(&ctx)?;
    Parser::new(&ctx, tokens).source_file()
}

/// Parse a standalone type expression such as `map[string][]*pkg.T`.
pub fn parse_type_expr(src: &str) -> Result<TypeExpr> {
    let ctx = SourceContext::new(src, "<type>");
    let tokens = tokenize(&ctx)?;
    let mut parser = Parser::new(&ctx, tokens);
    let ty = parser.parse_type()?;
    parser.skip_semicolons();
    parser.expect(TokenKind::Eof, "end of type expression")?;
    Ok(ty)
}

/// One entry of a parameter list before names and types are resolved.
enum ParamEntry {
    /// A lone identifier: either a parameter name or a type name.
    Bare(String),
    Named(String, TypeExpr),
    Type(TypeExpr),
}

struct Parser<'a> {
    ctx: &'a SourceContext<'a>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(ctx: &'a SourceContext<'a>, tokens: Vec<Token>) -> Self {
        Self {
            ctx,
            tokens,
            pos: 0,
        }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the current token and return its index.
    fn advance(&mut self) -> usize {
        let idx = self.pos;
        if self.peek_kind() != TokenKind::Eof {
            self.pos += 1;
        }
        idx
    }

    fn text(&self, idx: usize) -> &'a str {
        self.tokens[idx].text(self.ctx.src())
    }

    /// Source text from the token at `start` through the last consumed token.
    fn text_since(&self, start: usize) -> String {
        let from = self.tokens[start].span.start;
        let to = self.tokens[self.pos.saturating_sub(1).max(start)].span.end;
        self.ctx.src()[from..to].to_string()
    }

    fn describe(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Semicolon if token.span.is_empty() => "newline".to_string(),
            _ => format!("'{}'", token.text(self.ctx.src())),
        }
    }

    fn error_here(&self, expected: &str) -> Box<Error> {
        let token = self.peek();
        self.ctx.parse_error(
            format!("expected {expected}, found {}", self.describe(token)),
            token.span,
        )
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<usize> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String> {
        let idx = self.expect(TokenKind::Ident, expected)?;
        Ok(self.text(idx).to_string())
    }

    fn skip_semicolons(&mut self) {
        while self.at(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Consume the terminator of a spec, field or declaration. The semicolon
    /// may be omitted before one of `closers` or at end of file.
    fn end_of_spec(&mut self, closers: &[TokenKind]) -> Result<()> {
        let kind = self.peek_kind();
        if kind == TokenKind::Semicolon {
            self.advance();
            Ok(())
        } else if kind == TokenKind::Eof || closers.contains(&kind) {
            Ok(())
        } else {
            Err(self.error_here("';' or newline"))
        }
    }

    /// Consume a bracketed group starting at the current opening token.
    fn skip_balanced(&mut self) -> Result<()> {
        let open = self.peek().clone();
        let mut stack = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    stack.push(token.kind)
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    self.close(&mut stack, &token)?;
                    if stack.is_empty() {
                        self.advance();
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .parse_error(format!("unclosed {}", self.describe(&open)), open.span));
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn close(&self, stack: &mut Vec<TokenKind>, token: &Token) -> Result<()> {
        let expected_open = match token.kind {
            TokenKind::RParen => TokenKind::LParen,
            TokenKind::RBracket => TokenKind::LBracket,
            _ => TokenKind::LBrace,
        };
        match stack.pop() {
            Some(open) if open == expected_open => Ok(()),
            _ => Err(self
                .ctx
                .parse_error(format!("unexpected {}", self.describe(token)), token.span)),
        }
    }

    fn doc_lines(&self, idx: usize) -> Vec<String> {
        self.tokens[idx]
            .doc
            .iter()
            .map(|c| c.text.clone())
            .collect()
    }

    // =========================================================================
    // File structure
    // =========================================================================

    fn source_file(mut self) -> Result<SourceFile> {
        self.skip_semicolons();
        self.expect(TokenKind::Keyword(Keyword::Package), "'package'")?;
        let package = self.expect_ident("package name")?;
        self.end_of_spec(&[])?;

        let mut imports = Vec::new();
        let mut type_decls = Vec::new();
        let mut seen_decl = false;

        loop {
            self.skip_semicolons();
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Keyword(Keyword::Import) if !seen_decl => {
                    self.import_decl(&mut imports)?;
                }
                TokenKind::Keyword(Keyword::Import) => {
                    return Err(self.ctx.parse_error(
                        "imports must appear before other declarations",
                        self.peek().span,
                    ));
                }
                TokenKind::Keyword(Keyword::Type) => {
                    seen_decl = true;
                    self.type_decl(&mut type_decls)?;
                }
                TokenKind::Keyword(Keyword::Func | Keyword::Var | Keyword::Const) => {
                    seen_decl = true;
                    self.skip_decl()?;
                }
                _ => return Err(self.error_here("declaration")),
            }
        }

        Ok(SourceFile {
            package,
            imports,
            type_decls,
        })
    }

    fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> Result<()> {
        self.advance();
        if self.at(TokenKind::LParen) {
            self.advance();
            loop {
                self.skip_semicolons();
                if self.at(TokenKind::RParen) {
                    self.advance();
                    break;
                }
                imports.push(self.import_spec()?);
                self.end_of_spec(&[TokenKind::RParen])?;
            }
        } else {
            imports.push(self.import_spec()?);
        }
        self.end_of_spec(&[])
    }

    fn import_spec(&mut self) -> Result<ImportSpec> {
        let name = match self.peek_kind() {
            TokenKind::Ident => Some({ let i = self.advance(); self.text(i) }.to_string()),
            TokenKind::Dot => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };
        let idx = self.expect(TokenKind::String, "import path")?;
        Ok(ImportSpec {
            name,
            path: unquote(self.text(idx)),
        })
    }

    /// Skip a `func`, `var` or `const` declaration.
    fn skip_decl(&mut self) -> Result<()> {
        let mut stack = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof if stack.is_empty() => return Ok(()),
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .parse_error("unexpected end of file", token.span));
                }
                TokenKind::Semicolon if stack.is_empty() => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    stack.push(token.kind)
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    self.close(&mut stack, &token)?
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn type_decl(&mut self, out: &mut Vec<TypeDecl>) -> Result<()> {
        let type_idx = self.advance();
        let group_doc = self.doc_lines(type_idx);

        if self.at(TokenKind::LParen) {
            self.advance();
            let mut first = true;
            loop {
                self.skip_semicolons();
                if self.at(TokenKind::RParen) {
                    self.advance();
                    break;
                }
                let own_doc = self.doc_lines(self.pos);
                // The group's doc comment belongs to its first spec.
                let doc = if first && own_doc.is_empty() {
                    group_doc.clone()
                } else {
                    own_doc
                };
                out.push(self.type_spec(doc)?);
                first = false;
                self.end_of_spec(&[TokenKind::RParen])?;
            }
        } else {
            out.push(self.type_spec(group_doc)?);
        }
        self.end_of_spec(&[])
    }

    fn type_spec(&mut self, doc: Vec<String>) -> Result<TypeDecl> {
        let start = self.peek().span;
        let name = self.expect_ident("type name")?;

        let is_generic = self.at(TokenKind::LBracket) && self.looks_like_type_params();
        if is_generic {
            self.skip_balanced()?;
        }

        let is_alias = self.at(TokenKind::Assign);
        if is_alias {
            self.advance();
        }

        let ty = self.parse_type()?;
        let end = self.tokens[self.pos.saturating_sub(1)].span;

        Ok(TypeDecl {
            doc,
            name,
            is_alias,
            is_generic,
            ty,
            span: start.to(end),
        })
    }

    /// Distinguish `type L[T any] ...` from the array type `type A [N]int`.
    fn looks_like_type_params(&self) -> bool {
        self.nth_kind(1) == TokenKind::Ident
            && matches!(
                self.nth_kind(2),
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Tilde
                    | TokenKind::LBracket
                    | TokenKind::LParen
                    | TokenKind::Keyword(
                        Keyword::Map
                            | Keyword::Chan
                            | Keyword::Func
                            | Keyword::Struct
                            | Keyword::Interface
                    )
            )
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> Result<TypeExpr> {
        let start = self.pos;
        match self.peek_kind() {
            TokenKind::Ident => {
                let name = { let i = self.advance(); self.text(i) }.to_string();
                let ty = if self.at(TokenKind::Dot) {
                    self.advance();
                    let member = self.expect_ident("type name after '.'")?;
                    TypeExpr::Qualified {
                        package: name,
                        name: member,
                    }
                } else {
                    TypeExpr::Ident(name)
                };
                if self.at(TokenKind::LBracket) {
                    // Generic instantiation such as `List[int]`.
                    self.skip_balanced()?;
                    return Ok(TypeExpr::Unsupported(self.text_since(start)));
                }
                Ok(ty)
            }
            TokenKind::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::LBracket => {
                self.advance();
                if self.at(TokenKind::RBracket) {
                    self.advance();
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.array_len()?;
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Keyword(Keyword::Map) => {
                self.advance();
                self.expect(TokenKind::LBracket, "'[' after 'map'")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket, "']' after map key type")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::Keyword(Keyword::Chan) => {
                self.advance();
                let dir = if self.at(TokenKind::Arrow) {
                    self.advance();
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect(TokenKind::Keyword(Keyword::Chan), "'chan' after '<-'")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Keyword(Keyword::Func) => {
                self.advance();
                Ok(TypeExpr::Func(self.signature()?))
            }
            TokenKind::Keyword(Keyword::Struct) => {
                self.advance();
                Ok(TypeExpr::Struct(self.struct_fields()?))
            }
            TokenKind::Keyword(Keyword::Interface) => {
                self.advance();
                Ok(TypeExpr::Interface(self.interface_elems()?))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            _ => Err(self.error_here("type")),
        }
    }

    /// Consume an array length up to and including its closing `]`.
    fn array_len(&mut self) -> Result<String> {
        let start = self.pos;
        let mut stack = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::RBracket if stack.is_empty() => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    stack.push(token.kind)
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    self.close(&mut stack, &token)?
                }
                TokenKind::Eof | TokenKind::Semicolon => {
                    return Err(self.error_here("']' after array length"));
                }
                _ => {}
            }
            self.advance();
        }
        let len = self.text_since(start);
        self.advance();
        Ok(len)
    }

    fn starts_type(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Arrow
                | TokenKind::Keyword(
                    Keyword::Map | Keyword::Chan | Keyword::Func | Keyword::Struct | Keyword::Interface
                )
        )
    }

    fn signature(&mut self) -> Result<Signature> {
        let params = self.param_list()?;
        let results = match self.peek_kind() {
            TokenKind::LParen => self.param_list()?,
            kind if Self::starts_type(kind) => vec![ParamGroup {
                names: Vec::new(),
                ty: self.parse_type()?,
            }],
            _ => Vec::new(),
        };
        Ok(Signature { params, results })
    }

    fn param_list(&mut self) -> Result<Vec<ParamGroup>> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let mut entries = Vec::new();
        loop {
            if self.at(TokenKind::RParen) {
                self.advance();
                break;
            }
            entries.push(self.param_entry()?);
            match self.peek_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {}
                _ => return Err(self.error_here("',' or ')'")),
            }
        }
        let span = self.tokens[open].span.to(self.tokens[self.pos - 1].span);
        self.resolve_params(entries, span)
    }

    fn param_entry(&mut self) -> Result<ParamEntry> {
        match self.peek_kind() {
            TokenKind::Ident => match self.nth_kind(1) {
                TokenKind::Dot => Ok(ParamEntry::Type(self.parse_type()?)),
                // `List[int]` as an unnamed parameter, not `a [N]T`.
                TokenKind::LBracket
                    if matches!(self.kind_after_index(), TokenKind::Comma | TokenKind::RParen) =>
                {
                    Ok(ParamEntry::Type(self.parse_type()?))
                }
                TokenKind::Comma | TokenKind::RParen => {
                    let name = { let i = self.advance(); self.text(i) }.to_string();
                    Ok(ParamEntry::Bare(name))
                }
                TokenKind::Ellipsis => {
                    let name = { let i = self.advance(); self.text(i) }.to_string();
                    self.advance();
                    let ty = TypeExpr::Ellipsis(Box::new(self.parse_type()?));
                    Ok(ParamEntry::Named(name, ty))
                }
                _ => {
                    let name = { let i = self.advance(); self.text(i) }.to_string();
                    Ok(ParamEntry::Named(name, self.parse_type()?))
                }
            },
            TokenKind::Ellipsis => {
                self.advance();
                Ok(ParamEntry::Type(TypeExpr::Ellipsis(Box::new(
                    self.parse_type()?,
                ))))
            }
            _ => Ok(ParamEntry::Type(self.parse_type()?)),
        }
    }

    /// Group names with the type that follows them, as in `a, b int`.
    fn resolve_params(&self, entries: Vec<ParamEntry>, span: Span) -> Result<Vec<ParamGroup>> {
        let any_named = entries
            .iter()
            .any(|e| matches!(e, ParamEntry::Named(..)));

        if !any_named {
            return Ok(entries
                .into_iter()
                .map(|e| ParamGroup {
                    names: Vec::new(),
                    ty: match e {
                        ParamEntry::Bare(name) => TypeExpr::Ident(name),
                        ParamEntry::Named(_, ty) | ParamEntry::Type(ty) => ty,
                    },
                })
                .collect());
        }

        let mixed = || {
            self.ctx
                .parse_error("mixed named and unnamed parameters", span)
        };
        let mut groups = Vec::new();
        let mut names = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(name) => names.push(name),
                ParamEntry::Named(name, ty) => {
                    names.push(name);
                    groups.push(ParamGroup {
                        names: std::mem::take(&mut names),
                        ty,
                    });
                }
                ParamEntry::Type(_) => return Err(mixed()),
            }
        }
        if !names.is_empty() {
            return Err(mixed());
        }
        Ok(groups)
    }

    fn struct_fields(&mut self) -> Result<Vec<FieldDecl>> {
        self.expect(TokenKind::LBrace, "'{' after 'struct'")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at(TokenKind::RBrace) {
                self.advance();
                break;
            }
            fields.push(self.field_decl()?);
            self.end_of_spec(&[TokenKind::RBrace])?;
        }
        Ok(fields)
    }

    fn field_decl(&mut self) -> Result<FieldDecl> {
        let embedded = match self.peek_kind() {
            TokenKind::Star => true,
            TokenKind::Ident => match self.nth_kind(1) {
                TokenKind::Dot | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String => {
                    true
                }
                TokenKind::LBracket => self.is_embedded_instantiation(),
                _ => false,
            },
            _ => return Err(self.error_here("field name or embedded type")),
        };

        let mut names = Vec::new();
        if !embedded {
            loop {
                names.push(self.expect_ident("field name")?);
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        let ty = self.parse_type()?;

        let tag = if self.at(TokenKind::String) {
            Some({ let i = self.advance(); self.text(i) }.to_string())
        } else {
            None
        };

        Ok(FieldDecl { names, ty, tag })
    }

    /// `List[int]` as an embedded field, as opposed to `items []int`.
    fn is_embedded_instantiation(&self) -> bool {
        matches!(
            self.kind_after_index(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String
        )
    }

    /// Kind of the token that follows the bracketed group after the current
    /// identifier, as in `Name[...] <token>`.
    fn kind_after_index(&self) -> TokenKind {
        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.pos + 1..].iter().enumerate() {
            match token.kind {
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.nth_kind(offset + 2);
                    }
                }
                TokenKind::Eof => return TokenKind::Eof,
                _ => {}
            }
        }
        TokenKind::Eof
    }

    fn interface_elems(&mut self) -> Result<Vec<InterfaceElem>> {
        self.expect(TokenKind::LBrace, "'{' after 'interface'")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at(TokenKind::RBrace) {
                self.advance();
                break;
            }
            let elem = if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::LParen {
                let name = { let i = self.advance(); self.text(i) }.to_string();
                InterfaceElem::Method {
                    name,
                    signature: self.signature()?,
                }
            } else {
                InterfaceElem::Embedded(self.constraint_elem()?)
            };
            elems.push(elem);
            self.end_of_spec(&[TokenKind::RBrace])?;
        }
        Ok(elems)
    }

    /// An embedded interface element; type-set terms (`~T`, `A | B`) are kept
    /// as unsupported source text.
    fn constraint_elem(&mut self) -> Result<TypeExpr> {
        let start = self.pos;
        if self.at(TokenKind::Tilde) {
            self.skip_elem_rest()?;
            return Ok(TypeExpr::Unsupported(self.text_since(start)));
        }
        let ty = self.parse_type()?;
        if self.at(TokenKind::Pipe) {
            self.skip_elem_rest()?;
            return Ok(TypeExpr::Unsupported(self.text_since(start)));
        }
        Ok(ty)
    }

    fn skip_elem_rest(&mut self) -> Result<()> {
        let mut stack = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Semicolon | TokenKind::RBrace if stack.is_empty() => return Ok(()),
                TokenKind::Eof => return Err(self.error_here("'}'")),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    stack.push(token.kind)
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    self.close(&mut stack, &token)?
                }
                _ => {}
            }
            self.advance();
        }
    }
}

/// Strip quotes from a string literal, resolving simple escapes.
fn unquote(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
