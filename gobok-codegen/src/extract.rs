//! Declaration extraction: annotated struct types to structure records.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use gobok_core::upper_first;
use gobok_syntax::{FieldDecl, SourceFile, TypeDecl, TypeExpr, TypeText, is_identifier, serialize};
use tracing::debug;

use crate::{
    diagnostic::{Diagnostic, Phase},
    imports::{ImportEntry, ImportTable, is_builtin_type},
};

pub const BUILDER_MARKER: &str = "//gobok:builder";
pub const CONSTRUCTOR_MARKER: &str = "//gobok:constructor";
pub const NAMED_CONSTRUCTOR_PREFIX: &str = "//gobok:constructor:name=";

/// Generation modes requested by a declaration's doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    pub builder: bool,
    pub constructor: bool,
    pub constructor_name: Option<String>,
}

impl Markers {
    /// Scan comment lines for markers. Each line must match exactly after
    /// trimming surrounding whitespace.
    ///
    /// ```
    /// use gobok_codegen::Markers;
    ///
    /// let markers = Markers::scan(["// User is a user.", "//gobok:constructor:name=MakeUser"]);
    /// assert!(markers.constructor);
    /// assert!(!markers.builder);
    /// assert_eq!(markers.constructor_name.as_deref(), Some("MakeUser"));
    /// ```
    pub fn scan<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut markers = Self::default();
        for line in lines {
            let line = line.trim();
            if line == BUILDER_MARKER {
                markers.builder = true;
            } else if line == CONSTRUCTOR_MARKER {
                markers.constructor = true;
            } else if let Some(name) = line.strip_prefix(NAMED_CONSTRUCTOR_PREFIX) {
                markers.constructor = true;
                let name = name.trim();
                if !name.is_empty() {
                    markers.constructor_name = Some(name.to_string());
                }
            }
        }
        markers
    }

    pub fn any(&self) -> bool {
        self.builder || self.constructor
    }
}

/// One named field of a structure, with its serialized type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub name: String,
    pub ty: String,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// One annotated struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRecord {
    pub name: String,
    pub fields: Vec<FieldRecord>,
    pub builder: bool,
    pub constructor: bool,
    pub constructor_name: Option<String>,
    /// Imports the field types refer to, in first-use order.
    pub imports: Vec<ImportEntry>,
    /// File the declaration came from.
    pub source: PathBuf,
}

impl StructureRecord {
    /// `<Name>Builder`
    pub fn builder_name(&self) -> String {
        format!("{}Builder", self.name)
    }

    /// The override from the named marker, else `New<Name>`.
    pub fn constructor_fn_name(&self) -> String {
        match &self.constructor_name {
            Some(name) => name.clone(),
            None => format!("New{}", self.name),
        }
    }

    /// Builder setter names in field order. A name already taken by an
    /// earlier field gets a numeric suffix, so `name` and `Name` produce
    /// `SetName` and `SetName2`.
    pub fn setter_names(&self) -> Vec<String> {
        let mut taken = HashSet::new();
        self.fields
            .iter()
            .map(|field| {
                let base = format!("Set{}", upper_first(&field.name));
                let mut name = base.clone();
                let mut n = 2;
                while !taken.insert(name.clone()) {
                    name = format!("{base}{n}");
                    n += 1;
                }
                name
            })
            .collect()
    }
}

/// Everything one file contributes to its directory.
#[derive(Debug, Default)]
pub struct Extraction {
    pub structures: Vec<StructureRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract structure records from a parsed file.
///
/// In strict mode a field type that cannot be reproduced makes the whole
/// structure an error; otherwise it is written as `interface{}` with a warning.
pub fn extract(file: &SourceFile, path: &Path, strict: bool) -> Extraction {
    let table = ImportTable::from_file(file);
    let mut out = Extraction::default();

    for decl in &file.type_decls {
        let markers = Markers::scan(decl.doc.iter().map(String::as_str));
        if !markers.any() {
            continue;
        }
        let location = format!("{}:{}", path.display(), decl.name);

        let Some(fields) = struct_fields(decl) else {
            debug!(name = %decl.name, "annotated declaration is not a struct");
            out.diagnostics.push(
                Diagnostic::info(
                    Phase::Extract,
                    format!("`{}` is not a struct type; skipped", decl.name),
                )
                .at(&location),
            );
            continue;
        };

        if let Some(name) = &markers.constructor_name {
            if !is_identifier(name) {
                out.diagnostics.push(
                    Diagnostic::warning(
                        Phase::Extract,
                        format!("constructor name `{name}` is not a valid Go identifier"),
                    )
                    .at(&location),
                );
            }
        }

        let mut record = StructureRecord {
            name: decl.name.clone(),
            fields: Vec::new(),
            builder: markers.builder,
            constructor: markers.constructor,
            constructor_name: markers.constructor_name,
            imports: Vec::new(),
            source: path.to_path_buf(),
        };
        let mut imports = Vec::new();
        let mut failed = false;

        for field in fields.iter().filter(|f| !f.is_embedded()) {
            // Blank fields cannot be named in a composite literal.
            let names: Vec<&String> = field.names.iter().filter(|n| n.as_str() != "_").collect();
            if names.is_empty() {
                continue;
            }
            let rendered = serialize(&field.ty);
            if let TypeText::Unsupported { text, shapes } = &rendered {
                let shapes = shapes.join("`, `");
                let diag = if strict {
                    failed = true;
                    Diagnostic::error(
                        Phase::Extract,
                        format!(
                            "field {} uses unsupported type `{shapes}`",
                            field.names.join(", ")
                        ),
                    )
                } else {
                    Diagnostic::warning(
                        Phase::Extract,
                        format!(
                            "field {} uses unsupported type `{shapes}`; written as {text}",
                            field.names.join(", ")
                        ),
                    )
                };
                out.diagnostics.push(diag.at(&location));
            }
            let ty = rendered.or_any();

            resolve_field_imports(field, &table, &mut imports, &mut out.diagnostics, &location);

            for name in names {
                record.fields.push(FieldRecord::new(name, ty.clone()));
            }
        }

        if failed {
            continue;
        }
        if record.builder {
            for (field, setter) in record.fields.iter().zip(record.setter_names()) {
                let default = format!("Set{}", upper_first(&field.name));
                if setter != default {
                    out.diagnostics.push(
                        Diagnostic::warning(
                            Phase::Extract,
                            format!(
                                "setter `{default}` for field {} is already taken; named `{setter}`",
                                field.name
                            ),
                        )
                        .at(&location),
                    );
                }
            }
        }
        debug!(
            name = %record.name,
            fields = record.fields.len(),
            builder = record.builder,
            constructor = record.constructor,
            "extracted structure"
        );
        for entry in imports {
            if !record.imports.contains(&entry) {
                record.imports.push(entry);
            }
        }
        out.structures.push(record);
    }

    out
}

/// Fields of a plain (non-alias, non-generic) struct declaration.
fn struct_fields(decl: &TypeDecl) -> Option<&[FieldDecl]> {
    if decl.is_alias || decl.is_generic {
        return None;
    }
    match &decl.ty {
        TypeExpr::Struct(fields) => Some(fields),
        _ => None,
    }
}

fn resolve_field_imports(
    field: &FieldDecl,
    table: &ImportTable<'_>,
    imports: &mut Vec<ImportEntry>,
    diagnostics: &mut Vec<Diagnostic>,
    location: &str,
) {
    for qualifier in field.ty.qualifiers() {
        if is_builtin_type(qualifier) {
            continue;
        }
        match table.resolve(qualifier) {
            Some(path) => imports.push(ImportEntry::new(qualifier, path)),
            None => diagnostics.push(
                Diagnostic::warning(
                    Phase::Resolve,
                    format!("package qualifier `{qualifier}` is not imported; import dropped"),
                )
                .at(location),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use gobok_syntax::parse_source;

    use super::*;
    use crate::diagnostic::Severity;

    fn run(src: &str, strict: bool) -> Extraction {
        let file = parse_source(src, "models.go").unwrap();
        extract(&file, Path::new("models.go"), strict)
    }

    #[test]
    fn test_markers_exact_match_only() {
        let markers = Markers::scan([
            "  //gobok:builder  ",
            "// gobok:constructor",
            "//gobok:constructorx",
        ]);
        assert!(markers.builder);
        assert!(!markers.constructor);
    }

    #[test]
    fn test_empty_constructor_name_is_bare_marker() {
        let markers = Markers::scan(["//gobok:constructor:name="]);
        assert!(markers.constructor);
        assert_eq!(markers.constructor_name, None);
    }

    #[test]
    fn test_shared_names_become_separate_fields() {
        let out = run(
            "package m\n\n//gobok:builder\ntype Point struct {\n\tX, Y int\n\tLabel string\n}\n",
            false,
        );
        let fields = &out.structures[0].fields;
        assert_eq!(
            fields,
            &vec![
                FieldRecord::new("X", "int"),
                FieldRecord::new("Y", "int"),
                FieldRecord::new("Label", "string"),
            ]
        );
    }

    #[test]
    fn test_embedded_fields_are_skipped() {
        let out = run(
            "package m\n\n//gobok:builder\ntype User struct {\n\tBase\n\t*sync.Mutex\n\tName string\n}\n",
            false,
        );
        assert_eq!(out.structures[0].fields, vec![FieldRecord::new("Name", "string")]);
        assert!(out.structures[0].imports.is_empty());
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let out = run(
            "package m\n\n//gobok:constructor\ntype Padded struct {\n\t_ [0]func()\n\tA, _ int\n}\n",
            false,
        );
        assert_eq!(out.structures[0].fields, vec![FieldRecord::new("A", "int")]);
    }

    #[test]
    fn test_blank_field_types_contribute_no_imports() {
        let out = run(
            "package m

import \"time\"

//gobok:constructor
type A struct {
	_ time.Time
	N int
}
",
            false,
        );
        assert_eq!(out.structures[0].fields, vec![FieldRecord::new("N", "int")]);
        assert!(out.structures[0].imports.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_array_length_qualifier_is_imported() {
        let out = run(
            "package m

import \"golang.org/x/sys/unix\"

//gobok:builder
type Entry struct {
	Name [unix.NAME_MAX]byte
}
",
            false,
        );
        assert_eq!(out.structures[0].fields[0].ty, "[unix.NAME_MAX]byte");
        assert_eq!(
            out.structures[0].imports,
            vec![ImportEntry::new("unix", "golang.org/x/sys/unix")]
        );
    }

    #[test]
    fn test_setter_name_collision_warns() {
        let out = run(
            "package m

//gobok:builder
type User struct {
	name string
	Name string
}
",
            false,
        );
        assert_eq!(out.structures[0].setter_names(), vec!["SetName", "SetName2"]);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].severity, Severity::Warning);
        assert!(out.diagnostics[0].message.contains("SetName2"));
    }

    #[test]
    fn test_setter_collision_ignored_without_builder() {
        let out = run(
            "package m

//gobok:constructor
type User struct {
	name string
	Name string
}
",
            false,
        );
        assert_eq!(out.structures[0].fields.len(), 2);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_default_and_named_constructor() {
        let out = run(
            "package m\n\n//gobok:constructor\ntype A struct{ X int }\n\n//gobok:constructor:name=MakeB\ntype B struct{ Y int }\n",
            false,
        );
        assert_eq!(out.structures[0].constructor_fn_name(), "NewA");
        assert!(out.structures[1].constructor);
        assert!(!out.structures[1].builder);
        assert_eq!(out.structures[1].constructor_fn_name(), "MakeB");
    }

    #[test]
    fn test_invalid_constructor_name_warns_but_is_kept() {
        let out = run(
            "package m\n\n//gobok:constructor:name=make-it\ntype A struct{ X int }\n",
            false,
        );
        assert_eq!(out.structures[0].constructor_fn_name(), "make-it");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_non_struct_declarations_are_skipped() {
        let out = run(
            "package m\n\n//gobok:builder\ntype ID int\n\n//gobok:builder\ntype Alias = Other\n\n//gobok:builder\ntype Box[T any] struct{ V T }\n",
            false,
        );
        assert!(out.structures.is_empty());
        assert_eq!(out.diagnostics.len(), 3);
        assert!(out.diagnostics.iter().all(|d| d.severity == Severity::Info));
    }

    #[test]
    fn test_unannotated_declarations_are_ignored() {
        let out = run(
            "package m\n\n// Plain has docs but no marker.\ntype Plain struct{ X int }\n\ntype Bare struct{}\n",
            false,
        );
        assert!(out.structures.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_imports_resolved_from_nested_types() {
        let out = run(
            r#"package m

import (
	"context"
	"time"
	str "strings"
	"github.com/google/uuid"
)

//gobok:builder
type Job struct {
	ID      uuid.UUID
	Timeout map[string]time.Duration
	Run     func(context.Context) error
	Missing http.Client
}
"#,
            false,
        );
        let imports: Vec<(&str, &str)> = out.structures[0]
            .imports
            .iter()
            .map(|e| (e.qualifier.as_str(), e.path.as_str()))
            .collect();
        assert_eq!(
            imports,
            vec![
                ("uuid", "github.com/google/uuid"),
                ("time", "time"),
                ("context", "context"),
            ]
        );
        assert_eq!(out.structures[0].fields[3].ty, "http.Client");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].phase, Phase::Resolve);
    }

    #[test]
    fn test_unsupported_type_placeholder_and_strict() {
        let src = "package m\n\n//gobok:builder\ntype W struct {\n\tItems []List[int]\n}\n";

        let lenient = run(src, false);
        assert_eq!(lenient.structures[0].fields[0].ty, "[]interface{}");
        assert_eq!(lenient.diagnostics[0].severity, Severity::Warning);

        let strict = run(src, true);
        assert!(strict.structures.is_empty());
        assert_eq!(strict.diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_instantiated_parameter_type_is_unsupported() {
        let src = "package m

//gobok:builder
type H struct {
	N int
	F func(List[int]) error
}
";

        let out = run(src, false);
        assert_eq!(
            out.structures[0].fields,
            vec![
                FieldRecord::new("N", "int"),
                FieldRecord::new("F", "func(interface{}) error"),
            ]
        );
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].severity, Severity::Warning);
    }
}
