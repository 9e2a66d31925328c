use std::{path::Path, str::FromStr};

use eyre::{Result, WrapErr, bail};
use serde::Deserialize;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "gobok.toml";

/// Name of the per-directory output file.
pub const DEFAULT_OUTPUT_FILE: &str = "gobok.go";

/// External command the generated source is piped through.
pub const DEFAULT_FORMATTER: &str = "gofmt";

/// Settings read from `gobok.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File written into every directory that has annotated types
    pub output_file: String,

    /// Extra directory names skipped during discovery
    pub exclude: Vec<String>,

    /// Treat unsupported field types as errors instead of `interface{}`
    pub strict: bool,

    /// Formatter command, or "none" to write unformatted output
    pub formatter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            exclude: Vec::new(),
            strict: false,
            formatter: DEFAULT_FORMATTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        content
            .parse::<Config>()
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }

    /// The formatter command, or `None` when formatting is disabled.
    pub fn formatter_command(&self) -> Option<&str> {
        let command = self.formatter.trim();
        (!command.is_empty() && command != "none").then_some(command)
    }

    fn validate(&self) -> Result<()> {
        let name = self.output_file.as_str();
        if !name.ends_with(".go") || name.contains(['/', '\\']) || name.len() <= ".go".len() {
            bail!("output_file must be a plain file name ending in .go, got {name:?}");
        }
        if name.ends_with("_test.go") {
            bail!("output_file must not be a test file, got {name:?}");
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.output_file, "gobok.go");
        assert_eq!(config.formatter_command(), Some("gofmt"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = "strict = true\nexclude = [\"testdata\"]".parse().unwrap();

        assert!(config.strict);
        assert_eq!(config.exclude, vec!["testdata"]);
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
    }

    #[test]
    fn test_formatter_none_disables_formatting() {
        let config: Config = "formatter = \"none\"".parse().unwrap();
        assert_eq!(config.formatter_command(), None);

        let custom: Config = "formatter = \"goimports\"".parse().unwrap();
        assert_eq!(custom.formatter_command(), Some("goimports"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!("outputfile = \"x.go\"".parse::<Config>().is_err());
    }

    #[test]
    fn test_rejects_bad_output_file() {
        for bad in ["gen/out.go", "out.txt", ".go", "out_test.go"] {
            let src = format!("output_file = {bad:?}");
            assert!(src.parse::<Config>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "strict = \"yes\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration in"));
    }
}
