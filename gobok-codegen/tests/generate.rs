//! End-to-end generation over temporary Go trees.

use std::{
    fs,
    path::{Path, PathBuf},
};

use gobok_codegen::{Formatter, Generator, Severity, scan};
use gobok_core::Config;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn generate(root: &Path, config: &Config) -> gobok_codegen::GenerateResult {
    let scan = scan(&[root.to_path_buf()], config);
    Generator::new(&scan.context, config, Formatter::Disabled).generate()
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_person_builder() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "people/person.go",
        r#"package people

// Person is a person.
//gobok:builder
type Person struct {
	Name string
	Age  int
	Tags []string
}
"#,
    );

    let result = generate(temp.path(), &Config::default());
    assert_eq!(result.written, vec![temp.path().join("people").join("gobok.go")]);

    let code = read(temp.path().join("people/gobok.go"));
    let header = gobok_core::generated_header();
    assert!(code.starts_with(&format!("{header}\n\npackage people\n\n")));
    let body = code.replacen(&header, "HEADER", 1).replace('\t', "    ");
    insta::assert_snapshot!(body, @r"
    HEADER

    package people

    // PersonBuilder builds Person values.
    type PersonBuilder struct {
        instance Person
    }

    // NewPersonBuilder returns an empty PersonBuilder.
    func NewPersonBuilder() *PersonBuilder {
        return &PersonBuilder{}
    }

    // SetName sets Name.
    func (b *PersonBuilder) SetName(name string) *PersonBuilder {
        b.instance.Name = name
        return b
    }

    // SetAge sets Age.
    func (b *PersonBuilder) SetAge(age int) *PersonBuilder {
        b.instance.Age = age
        return b
    }

    // SetTags sets Tags.
    func (b *PersonBuilder) SetTags(tags []string) *PersonBuilder {
        b.instance.Tags = tags
        return b
    }

    // Build returns a new Person with the values set so far.
    func (b *PersonBuilder) Build() *Person {
        instance := b.instance
        return &instance
    }
    ");
}

#[test]
fn test_two_files_one_output() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "shop/order.go",
        "package shop\n\nimport \"time\"\n\n//gobok:constructor\ntype Order struct {\n\tPlaced time.Time\n}\n",
    );
    write(
        temp.path(),
        "shop/item.go",
        "package shop\n\n//gobok:constructor:name=MakeItem\ntype Item struct {\n\tSKU   string\n\tPrice, Tax float64\n}\n",
    );

    let result = generate(temp.path(), &Config::default());
    assert_eq!(result.written.len(), 1);

    let code = read(temp.path().join("shop/gobok.go"));
    assert!(code.contains("import (\n\t\"time\"\n)\n"));
    // item.go sorts before order.go.
    let item = code.find("func MakeItem(sku string, price float64, tax float64) *Item {").unwrap();
    let order = code.find("func NewOrder(placed time.Time) *Order {").unwrap();
    assert!(item < order);
    assert!(code.contains("return &Item{SKU: sku, Price: price, Tax: tax}"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "cfg/config.go",
        "package cfg\n\n//gobok:builder\n//gobok:constructor\ntype Config struct {\n\tHosts map[string][]string\n\tOnExit func(code int) error\n}\n",
    );
    let config = Config::default();

    let first = generate(temp.path(), &config);
    let before = read(temp.path().join("cfg/gobok.go"));
    let second = generate(temp.path(), &config);
    let after = read(temp.path().join("cfg/gobok.go"));

    assert_eq!(first.written.len(), 1);
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 1);
    assert_eq!(before, after);
    assert!(after.contains("func NewConfig(hosts map[string][]string, onExit func(int) error) *Config {"));
}

#[test]
fn test_unresolved_qualifier_is_not_imported() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "svc/svc.go",
        r#"package svc

import (
	"net/http"
	log "github.com/sirupsen/logrus"
)

//gobok:constructor
type Service struct {
	Client *http.Client
	Logger *log.Logger
	Cache  redis.Client
}
"#,
    );

    let config = Config::default();
    let scan = scan(&[temp.path().to_path_buf()], &config);
    assert!(!scan.context.has_errors());
    assert!(
        scan.context
            .diagnostics()
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("redis"))
    );

    Generator::new(&scan.context, &config, Formatter::Disabled).generate();
    let code = read(temp.path().join("svc/gobok.go"));
    assert!(code.contains(
        "import (\n\tlog \"github.com/sirupsen/logrus\"\n\t\"net/http\"\n)\n"
    ));
    assert!(!code.contains("redis\""));
    assert!(code.contains("cache redis.Client"));
}

#[test]
fn test_strict_mode_skips_unsupported_structure() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "g/g.go",
        "package g\n\n//gobok:builder\ntype Holder struct {\n\tItems List[int]\n}\n\n//gobok:builder\ntype Plain struct {\n\tN int\n}\n",
    );

    let lenient = scan(&[temp.path().to_path_buf()], &Config::default());
    assert_eq!(lenient.context.structure_count(), 2);
    assert!(!lenient.context.has_errors());

    let strict_config = Config {
        strict: true,
        ..Config::default()
    };
    let strict = scan(&[temp.path().to_path_buf()], &strict_config);
    assert_eq!(strict.context.structure_count(), 1);
    assert!(strict.context.has_errors());
}

#[test]
fn test_directory_without_annotations_gets_no_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "util/util.go", "package util\n\ntype Plain struct{ X int }\n");

    let result = generate(temp.path(), &Config::default());
    assert!(result.written.is_empty());
    assert!(!temp.path().join("util/gobok.go").exists());
}
