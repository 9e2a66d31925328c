//! Import resolution for field types.

use std::collections::{BTreeMap, HashMap};

use gobok_syntax::SourceFile;

/// Predeclared Go type names, which never name a package.
const BUILTIN_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "interface",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Returns true if `name` is a predeclared Go type.
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// One resolved external package reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Short name used in field type text.
    pub qualifier: String,
    /// Full import path from the source file's import block.
    pub path: String,
}

impl ImportEntry {
    pub fn new(qualifier: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            path: path.into(),
        }
    }

    /// Whether the import line needs an explicit name, i.e. the qualifier
    /// differs from the last path segment.
    pub fn needs_alias(&self) -> bool {
        self.path.rsplit('/').next() != Some(self.qualifier.as_str())
    }

    /// The import spec as written inside an `import ( ... )` block.
    pub fn spec(&self) -> String {
        if self.needs_alias() {
            format!("{} \"{}\"", self.qualifier, self.path)
        } else {
            format!("\"{}\"", self.path)
        }
    }
}

/// Local name to path lookup for one source file.
///
/// Blank and dot imports are left out since no qualifier refers to them.
#[derive(Debug, Default)]
pub struct ImportTable<'a> {
    entries: HashMap<&'a str, &'a str>,
}

impl<'a> ImportTable<'a> {
    pub fn from_file(file: &'a SourceFile) -> Self {
        let entries = file
            .imports
            .iter()
            .filter_map(|spec| Some((spec.local_name()?, spec.path.as_str())))
            .collect();
        Self { entries }
    }

    /// Look up the import path for `qualifier`.
    pub fn resolve(&self, qualifier: &str) -> Option<&'a str> {
        self.entries.get(qualifier).copied()
    }
}

/// Imports of one output unit, keyed by qualifier.
///
/// A later insert for the same qualifier replaces the earlier path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    entries: BTreeMap<String, ImportEntry>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ImportEntry) {
        self.entries.insert(entry.qualifier.clone(), entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ImportEntry>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn get(&self, qualifier: &str) -> Option<&ImportEntry> {
        self.entries.get(qualifier)
    }

    /// Entries ordered by import path, then qualifier.
    pub fn sorted_by_path(&self) -> Vec<&ImportEntry> {
        let mut entries: Vec<&ImportEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.qualifier.cmp(&b.qualifier)));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use gobok_syntax::parse_source;

    use super::*;

    #[test]
    fn test_is_builtin_type() {
        assert!(is_builtin_type("string"));
        assert!(is_builtin_type("error"));
        assert!(!is_builtin_type("time"));
    }

    #[test]
    fn test_table_resolves_alias_and_last_segment() {
        let file = parse_source(
            "package p\nimport (\n\t\"time\"\n\tstr \"strings\"\n\t_ \"embed\"\n\t\"github.com/google/uuid\"\n)\n",
            "p.go",
        )
        .unwrap();
        let table = ImportTable::from_file(&file);

        assert_eq!(table.resolve("time"), Some("time"));
        assert_eq!(table.resolve("str"), Some("strings"));
        assert_eq!(table.resolve("strings"), None);
        assert_eq!(table.resolve("uuid"), Some("github.com/google/uuid"));
        assert_eq!(table.resolve("embed"), None);
    }

    #[test]
    fn test_entry_alias_rendering() {
        assert_eq!(ImportEntry::new("time", "time").spec(), "\"time\"");
        assert_eq!(
            ImportEntry::new("uuid", "github.com/google/uuid").spec(),
            "\"github.com/google/uuid\""
        );
        assert_eq!(
            ImportEntry::new("str", "strings").spec(),
            "str \"strings\""
        );
    }

    #[test]
    fn test_set_last_write_wins_and_sorts_by_path() {
        let mut set = ImportSet::new();
        set.insert(ImportEntry::new("rand", "math/rand"));
        set.insert(ImportEntry::new("http", "net/http"));
        set.insert(ImportEntry::new("rand", "crypto/rand"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("rand").unwrap().path, "crypto/rand");
        let paths: Vec<&str> = set.sorted_by_path().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["crypto/rand", "net/http"]);
    }
}
