//! Builder type and methods for one structure.

use super::params::{ParamNames, RECEIVER};
use crate::{
    builder::{CodeFragment, Renderable},
    extract::StructureRecord,
};

/// Field of the builder type that holds the value under construction.
const INSTANCE: &str = "instance";

/// `<Name>Builder` with its factory, one setter per field and `Build`.
pub struct BuilderDecl<'a> {
    record: &'a StructureRecord,
}

impl<'a> BuilderDecl<'a> {
    pub fn new(record: &'a StructureRecord) -> Self {
        Self { record }
    }

    fn type_decl(&self, builder: &str) -> Vec<CodeFragment> {
        vec![
            CodeFragment::comment(format!("{builder} builds {} values.", self.record.name)),
            CodeFragment::braced(
                format!("type {builder} struct {{"),
                vec![CodeFragment::line(format!("{INSTANCE} {}", self.record.name))],
            ),
        ]
    }

    fn factory(&self, builder: &str) -> Vec<CodeFragment> {
        vec![
            CodeFragment::comment(format!("New{builder} returns an empty {builder}.")),
            CodeFragment::braced(
                format!("func New{builder}() *{builder} {{"),
                vec![CodeFragment::line(format!("return &{builder}{{}}"))],
            ),
        ]
    }

    fn setter(&self, builder: &str, method: &str, field: &str, ty: &str) -> Vec<CodeFragment> {
        let param = ParamNames::new([RECEIVER, self.record.name.as_str()]).name_for(field);
        vec![
            CodeFragment::comment(format!("{method} sets {field}.")),
            CodeFragment::braced(
                format!("func ({RECEIVER} *{builder}) {method}({param} {ty}) *{builder} {{"),
                vec![
                    CodeFragment::line(format!("{RECEIVER}.{INSTANCE}.{field} = {param}")),
                    CodeFragment::line(format!("return {RECEIVER}")),
                ],
            ),
        ]
    }

    fn build(&self, builder: &str) -> Vec<CodeFragment> {
        let name = &self.record.name;
        vec![
            CodeFragment::comment(format!("Build returns a new {name} with the values set so far.")),
            CodeFragment::braced(
                format!("func ({RECEIVER} *{builder}) Build() *{name} {{"),
                vec![
                    CodeFragment::line(format!("{INSTANCE} := {RECEIVER}.{INSTANCE}")),
                    CodeFragment::line(format!("return &{INSTANCE}")),
                ],
            ),
        ]
    }
}

impl Renderable for BuilderDecl<'_> {
    /// Declarations separated by blank lines, without a trailing blank.
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let builder = self.record.builder_name();
        let mut decls = vec![self.type_decl(&builder), self.factory(&builder)];
        for (field, method) in self.record.fields.iter().zip(self.record.setter_names()) {
            decls.push(self.setter(&builder, &method, &field.name, &field.ty));
        }
        decls.push(self.build(&builder));

        let mut fragments = Vec::new();
        for (i, decl) in decls.into_iter().enumerate() {
            if i > 0 {
                fragments.push(CodeFragment::Blank);
            }
            fragments.extend(decl);
        }
        fragments
    }
}
