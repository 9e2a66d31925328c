//! Go source emission for aggregate units.

mod builder;
mod constructor;
mod params;

use std::path::{Path, PathBuf};

use gobok_core::{GeneratedFile, generated_header};

pub use self::{builder::BuilderDecl, constructor::ConstructorDecl, params::ParamNames};
use crate::{
    aggregate::AggregateUnit,
    builder::{CodeBuilder, CodeFragment, Renderable},
};

/// The companion file for one directory, e.g. `models/gobok.go`.
pub struct GoFile<'a> {
    unit: &'a AggregateUnit,
    output_file: &'a str,
}

impl<'a> GoFile<'a> {
    pub fn new(unit: &'a AggregateUnit, output_file: &'a str) -> Self {
        Self { unit, output_file }
    }

    /// Where the file goes, next to the sources it was built from.
    pub fn output_path(&self) -> PathBuf {
        self.path(&self.unit.dir)
    }

    fn declarations(&self) -> Vec<Vec<CodeFragment>> {
        let mut decls = Vec::new();
        for record in &self.unit.structures {
            if record.builder {
                decls.push(BuilderDecl::new(record).to_fragments());
            }
            if record.constructor {
                decls.push(ConstructorDecl::new(record).to_fragments());
            }
        }
        decls
    }
}

impl GeneratedFile for GoFile<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.output_file)
    }

    fn render(&self) -> String {
        let imports: Vec<CodeFragment> = self
            .unit
            .imports
            .sorted_by_path()
            .into_iter()
            .map(|entry| CodeFragment::line(entry.spec()))
            .collect();
        CodeBuilder::new()
            .line(&generated_header())
            .blank()
            .line(&format!("package {}", self.unit.package))
            .when(!imports.is_empty(), |b| {
                b.blank()
                    .fragment(CodeFragment::parenthesized("import (", imports))
            })
            .each(self.declarations(), |b, decl| b.blank().fragments(decl))
            .build()
    }
}
