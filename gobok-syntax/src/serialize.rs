//! Canonical text rendering of type expressions.

use std::fmt;

use crate::ast::{FieldDecl, InterfaceElem, ParamGroup, Signature, TypeExpr};

/// Placeholder written in place of a type shape gobok cannot reproduce.
pub const ANY_TYPE: &str = "interface{}";

/// Result of serializing a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeText {
    Known(String),
    /// At least one nested shape was unsupported. `text` has each of them
    /// replaced by [`ANY_TYPE`]; `shapes` holds their original source text.
    Unsupported { text: String, shapes: Vec<String> },
}

impl TypeText {
    /// Consume into the rendered text, falling back to [`ANY_TYPE`] for
    /// unsupported shapes.
    pub fn or_any(self) -> String {
        match self {
            TypeText::Known(text) | TypeText::Unsupported { text, .. } => text,
        }
    }
}

/// Serialize a type expression into Go source text.
///
/// Never fails: shapes without a faithful rendering become [`ANY_TYPE`] and
/// are reported through [`TypeText::Unsupported`].
///
/// ```
/// use gobok_syntax::{TypeText, parse_type_expr, serialize};
///
/// let ty = parse_type_expr("func(a, b int) (n int, err error)").unwrap();
/// assert_eq!(
///     serialize(&ty),
///     TypeText::Known("func(int, int) (int, error)".to_string())
/// );
/// ```
pub fn serialize(ty: &TypeExpr) -> TypeText {
    let mut printer = Printer {
        out: String::new(),
        shapes: Some(Vec::new()),
    };
    printer.ty(ty);
    match printer.shapes {
        Some(shapes) if !shapes.is_empty() => TypeText::Unsupported {
            text: printer.out,
            shapes,
        },
        _ => TypeText::Known(printer.out),
    }
}

impl fmt::Display for TypeExpr {
    /// Renders the expression with unsupported shapes kept as source text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            out: String::new(),
            shapes: None,
        };
        printer.ty(self);
        f.write_str(&printer.out)
    }
}

/// Writes type text. When `shapes` is set, unsupported shapes are collected
/// there and replaced by the placeholder; otherwise they are written verbatim.
struct Printer {
    out: String,
    shapes: Option<Vec<String>>,
}

impl Printer {
    fn ty(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Ident(name) => self.out.push_str(name),
            TypeExpr::Qualified { package, name } => {
                self.out.push_str(package);
                self.out.push('.');
                self.out.push_str(name);
            }
            TypeExpr::Pointer(inner) => {
                self.out.push('*');
                self.ty(inner);
            }
            TypeExpr::Slice(inner) => {
                self.out.push_str("[]");
                self.ty(inner);
            }
            TypeExpr::Array { len, elem } => {
                self.out.push('[');
                self.out.push_str(len);
                self.out.push(']');
                self.ty(elem);
            }
            TypeExpr::Map { key, value } => {
                self.out.push_str("map[");
                self.ty(key);
                self.out.push(']');
                self.ty(value);
            }
            TypeExpr::Chan { dir, elem } => {
                self.out.push_str(dir.prefix());
                self.ty(elem);
            }
            TypeExpr::Func(sig) => {
                self.out.push_str("func");
                self.signature(sig);
            }
            TypeExpr::Struct(fields) => self.struct_type(fields),
            TypeExpr::Interface(elems) => self.interface_type(elems),
            TypeExpr::Paren(inner) => {
                self.out.push('(');
                self.ty(inner);
                self.out.push(')');
            }
            TypeExpr::Ellipsis(inner) => {
                self.out.push_str("...");
                self.ty(inner);
            }
            TypeExpr::Unsupported(source) => match &mut self.shapes {
                Some(shapes) => {
                    shapes.push(source.clone());
                    self.out.push_str(ANY_TYPE);
                }
                None => self.out.push_str(source),
            },
        }
    }

    /// `(params)` plus the result clause; names are dropped.
    fn signature(&mut self, sig: &Signature) {
        self.out.push('(');
        self.type_list(&sig.params);
        self.out.push(')');

        let result_count: usize = sig.results.iter().map(ParamGroup::arity).sum();
        match result_count {
            0 => {}
            1 => {
                self.out.push(' ');
                self.ty(&sig.results[0].ty);
            }
            _ => {
                self.out.push_str(" (");
                self.type_list(&sig.results);
                self.out.push(')');
            }
        }
    }

    /// One entry per name, so `a, b int` becomes `int, int`.
    fn type_list(&mut self, groups: &[ParamGroup]) {
        let mut first = true;
        for group in groups {
            for _ in 0..group.arity() {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.ty(&group.ty);
            }
        }
    }

    fn struct_type(&mut self, fields: &[FieldDecl]) {
        if fields.is_empty() {
            self.out.push_str("struct{}");
            return;
        }
        self.out.push_str("struct { ");
        let mut first = true;
        for field in fields {
            let names: Vec<Option<&str>> = if field.is_embedded() {
                vec![None]
            } else {
                field.names.iter().map(|n| Some(n.as_str())).collect()
            };
            for name in names {
                if !first {
                    self.out.push_str("; ");
                }
                first = false;
                if let Some(name) = name {
                    self.out.push_str(name);
                    self.out.push(' ');
                }
                self.ty(&field.ty);
                if let Some(tag) = &field.tag {
                    self.out.push(' ');
                    self.out.push_str(tag);
                }
            }
        }
        self.out.push_str(" }");
    }

    fn interface_type(&mut self, elems: &[InterfaceElem]) {
        if elems.is_empty() {
            self.out.push_str(ANY_TYPE);
            return;
        }
        self.out.push_str("interface { ");
        for (i, elem) in elems.iter().enumerate() {
            if i > 0 {
                self.out.push_str("; ");
            }
            match elem {
                InterfaceElem::Method { name, signature } => {
                    self.out.push_str(name);
                    self.signature(signature);
                }
                InterfaceElem::Embedded(ty) => self.ty(ty),
            }
        }
        self.out.push_str(" }");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_type_expr;

    fn text(src: &str) -> String {
        match serialize(&parse_type_expr(src).unwrap()) {
            TypeText::Known(text) => text,
            other => panic!("expected known type for {src}, got {other:?}"),
        }
    }

    #[test]
    fn test_basic_shapes_round_trip() {
        for src in [
            "string",
            "*int",
            "[]string",
            "map[string]int",
            "chan int",
            "chan<- int",
            "<-chan int",
            "time.Time",
            "*http.Client",
            "[4]byte",
            "[]map[string][]*pkg.Item",
            "chan (<-chan int)",
        ] {
            assert_eq!(text(src), src);
        }
    }

    #[test]
    fn test_round_trip_reparses_to_same_tree() {
        for src in [
            "map[string]func(context.Context, ...string) (int, error)",
            "struct { a int; b string }",
            "interface { Read([]byte) (int, error); fmt.Stringer }",
        ] {
            let tree = parse_type_expr(src).unwrap();
            let again = parse_type_expr(&text(src)).unwrap();
            assert_eq!(serialize(&tree), serialize(&again));
        }
    }

    #[test]
    fn test_func_drops_names_and_expands_shared_types() {
        assert_eq!(text("func(a, b int, s string)"), "func(int, int, string)");
        assert_eq!(text("func() (x, y float64)"), "func() (float64, float64)");
        assert_eq!(text("func() (err error)"), "func() error");
        assert_eq!(text("func(string, int) bool"), "func(string, int) bool");
        assert_eq!(text("func(xs ...int)"), "func(...int)");
    }

    #[test]
    fn test_struct_fields_and_tags() {
        assert_eq!(text("struct{}"), "struct{}");
        assert_eq!(
            text("struct {\n\tX, Y int\n\tio.Reader\n}"),
            "struct { X int; Y int; io.Reader }"
        );
        assert_eq!(
            text("struct{ Name string `json:\"name\"` }"),
            "struct { Name string `json:\"name\"` }"
        );
    }

    #[test]
    fn test_interface_forms() {
        assert_eq!(text("interface{}"), "interface{}");
        assert_eq!(
            text("interface {\n\tClose() error\n}"),
            "interface { Close() error }"
        );
    }

    #[test]
    fn test_unsupported_shape_is_replaced_in_place() {
        let ty = parse_type_expr("[]List[int]").unwrap();
        assert_eq!(
            serialize(&ty),
            TypeText::Unsupported {
                text: "[]interface{}".to_string(),
                shapes: vec!["List[int]".to_string()],
            }
        );
        assert_eq!(ty.to_string(), "[]List[int]");
    }

    #[test]
    fn test_or_any() {
        assert_eq!(TypeText::Known("int".to_string()).or_any(), "int");
        let unsupported = TypeText::Unsupported {
            text: ANY_TYPE.to_string(),
            shapes: vec!["~int".to_string()],
        };
        assert_eq!(unsupported.or_any(), ANY_TYPE);
    }
}
