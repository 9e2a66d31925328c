//! Syntax tree for the parts of a Go file that gobok reads.

use crate::token::{Span, is_identifier};

/// A parsed Go source file.
///
/// Only the package clause, imports and type declarations are kept; function,
/// variable and constant declarations are skipped by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub type_decls: Vec<TypeDecl>,
}

/// One import spec, e.g. `str "strings"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (alias, `_` or `.`), if written.
    pub name: Option<String>,
    /// Unquoted import path.
    pub path: String,
}

impl ImportSpec {
    /// The name this import is referred to by in the file.
    ///
    /// Blank (`_`) and dot (`.`) imports have no usable qualifier and
    /// return `None`. Without an alias the last path segment is used.
    pub fn local_name(&self) -> Option<&str> {
        match self.name.as_deref() {
            Some("_") | Some(".") => None,
            Some(name) => Some(name),
            None => self.path.rsplit('/').next(),
        }
    }
}

/// A single type declaration (`type Name ...`), grouped or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Doc comment lines, each including its `//` or `/*` delimiter.
    pub doc: Vec<String>,
    pub name: String,
    /// `type A = B`
    pub is_alias: bool,
    /// `type L[T any] ...`
    pub is_generic: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Go type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `int`, `Person`
    Ident(String),
    /// `time.Time`
    Qualified { package: String, name: String },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`, with the length kept as source text
    Array { len: String, elem: Box<TypeExpr> },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(...) ...`
    Func(Signature),
    /// `struct { ... }`
    Struct(Vec<FieldDecl>),
    /// `interface { ... }`
    Interface(Vec<InterfaceElem>),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `...T`, only valid as the last parameter type
    Ellipsis(Box<TypeExpr>),
    /// A shape gobok does not model (generic instantiation, type-set union).
    /// Holds the original source text.
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl ChanDir {
    /// The keyword prefix including its trailing space.
    pub fn prefix(self) -> &'static str {
        match self {
            ChanDir::Both => "chan ",
            ChanDir::Send => "chan<- ",
            ChanDir::Recv => "<-chan ",
        }
    }
}

/// Parameters and results of a function type or method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<ParamGroup>,
    pub results: Vec<ParamGroup>,
}

/// `a, b int` or an unnamed `int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl ParamGroup {
    /// Number of entries this group contributes to a type list.
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

/// A struct field line. `names` is empty for an embedded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes.
    pub tag: Option<String>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method { name: String, signature: Signature },
    Embedded(TypeExpr),
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    /// Whether this is a plain structure type.
    pub fn is_struct(&self) -> bool {
        matches!(self, TypeExpr::Struct(_))
    }

    /// Package qualifiers referenced anywhere in this type, in source order.
    ///
    /// ```
    /// use gobok_syntax::parse_type_expr;
    ///
    /// let ty = parse_type_expr("map[string]func(time.Duration) *http.Client").unwrap();
    /// assert_eq!(ty.qualifiers(), vec!["time", "http"]);
    /// ```
    pub fn qualifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_qualifiers(&mut out);
        out
    }

    fn collect_qualifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeExpr::Ident(_) | TypeExpr::Unsupported(_) => {}
            TypeExpr::Qualified { package, .. } => out.push(package),
            TypeExpr::Pointer(inner)
            | TypeExpr::Slice(inner)
            | TypeExpr::Paren(inner)
            | TypeExpr::Ellipsis(inner)
            | TypeExpr::Chan { elem: inner, .. } => inner.collect_qualifiers(out),
            TypeExpr::Array { len, elem } => {
                out.extend(expr_qualifiers(len));
                elem.collect_qualifiers(out);
            }
            TypeExpr::Map { key, value } => {
                key.collect_qualifiers(out);
                value.collect_qualifiers(out);
            }
            TypeExpr::Func(sig) => sig.collect_qualifiers(out),
            TypeExpr::Struct(fields) => {
                for field in fields {
                    field.ty.collect_qualifiers(out);
                }
            }
            TypeExpr::Interface(elems) => {
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { signature, .. } => {
                            signature.collect_qualifiers(out)
                        }
                        InterfaceElem::Embedded(ty) => ty.collect_qualifiers(out),
                    }
                }
            }
        }
    }
}

/// Package qualifiers in a constant expression such as `2*unix.NAME_MAX`.
/// Text inside string literals is ignored.
fn expr_qualifiers(expr: &str) -> impl Iterator<Item = &str> {
    expr.split('"')
        .step_by(2)
        .flat_map(|code| code.split(|c: char| !(c == '_' || c == '.' || c.is_alphanumeric())))
        .filter_map(|word| {
            let (qualifier, member) = word.split_once('.')?;
            (is_identifier(qualifier) && is_identifier(member)).then_some(qualifier)
        })
}

impl Signature {
    fn collect_qualifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        for group in self.params.iter().chain(&self.results) {
            group.ty.collect_qualifiers(out);
        }
    }
}
