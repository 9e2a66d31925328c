//! All-fields constructor function for one structure.

use super::params::ParamNames;
use crate::{
    builder::{CodeFragment, Renderable},
    extract::StructureRecord,
};

/// `New<Name>(fields...) *<Name>`, or the overridden name.
pub struct ConstructorDecl<'a> {
    record: &'a StructureRecord,
}

impl<'a> ConstructorDecl<'a> {
    pub fn new(record: &'a StructureRecord) -> Self {
        Self { record }
    }
}

impl Renderable for ConstructorDecl<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let name = &self.record.name;
        let func = self.record.constructor_fn_name();
        let mut names = ParamNames::new([name.as_str()]);

        let mut params = Vec::with_capacity(self.record.fields.len());
        let mut inits = Vec::with_capacity(self.record.fields.len());
        for field in &self.record.fields {
            let param = names.name_for(&field.name);
            params.push(format!("{param} {}", field.ty));
            inits.push(format!("{}: {param}", field.name));
        }

        vec![
            CodeFragment::comment(format!("{func} constructs {name} from all of its fields.")),
            CodeFragment::braced(
                format!("func {func}({}) *{name} {{", params.join(", ")),
                vec![CodeFragment::line(format!(
                    "return &{name}{{{}}}",
                    inits.join(", ")
                ))],
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{builder::CodeBuilder, extract::FieldRecord};

    fn render(name: &str, constructor_name: Option<&str>, fields: &[(&str, &str)]) -> String {
        let record = StructureRecord {
            name: name.to_string(),
            fields: fields.iter().map(|(n, t)| FieldRecord::new(*n, *t)).collect(),
            builder: false,
            constructor: true,
            constructor_name: constructor_name.map(str::to_string),
            imports: Vec::new(),
            source: PathBuf::from("models.go"),
        };
        CodeBuilder::new().emit(&ConstructorDecl::new(&record)).build()
    }

    #[test]
    fn test_default_constructor() {
        let code = render("Person", None, &[("Name", "string"), ("Born", "time.Time")]);
        assert_eq!(
            code,
            "// NewPerson constructs Person from all of its fields.\n\
             func NewPerson(name string, born time.Time) *Person {\n\
             \treturn &Person{Name: name, Born: born}\n\
             }\n"
        );
    }

    #[test]
    fn test_named_constructor_without_fields() {
        let code = render("Empty", Some("MakeEmpty"), &[]);
        assert_eq!(
            code,
            "// MakeEmpty constructs Empty from all of its fields.\n\
             func MakeEmpty() *Empty {\n\
             \treturn &Empty{}\n\
             }\n"
        );
    }

    #[test]
    fn test_params_stay_distinct() {
        let code = render(
            "Token",
            None,
            &[("ID", "string"), ("Id", "int"), ("Token", "[]byte"), ("Range", "int")],
        );
        assert!(code.contains(
            "func NewToken(id string, idValue int, token []byte, rangeValue int) *Token {"
        ));
        assert!(code.contains(
            "return &Token{ID: id, Id: idValue, Token: token, Range: rangeValue}"
        ));
    }

    #[test]
    fn test_param_does_not_shadow_unexported_type() {
        let code = render("config", None, &[("config", "string")]);
        assert!(code.contains("func Newconfig(configValue string) *config {"));
        assert!(code.contains("return &config{config: configValue}"));
    }
}
