//! External formatting of rendered Go source.

use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
};

use eyre::{Context, Result, bail, eyre};
use gobok_core::Config;

/// How rendered text is formatted before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    /// Pipe the text through a command, e.g. `gofmt` or `goimports -local x`.
    Command(Vec<String>),
    /// Write the text as rendered.
    Disabled,
}

impl Formatter {
    /// The configured formatter, unless `no_format` turns it off.
    pub fn from_config(config: &Config, no_format: bool) -> Self {
        if no_format {
            return Self::Disabled;
        }
        match config.formatter_command() {
            Some(command) => Self::command(command),
            None => Self::Disabled,
        }
    }

    /// Split a command line on whitespace.
    pub fn command(line: &str) -> Self {
        let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            Self::Disabled
        } else {
            Self::Command(argv)
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    /// Format `source`, failing if the command cannot run, exits non-zero or
    /// prints something other than UTF-8.
    pub fn format(&self, source: &str) -> Result<String> {
        let argv = match self {
            Self::Command(argv) => argv,
            Self::Disabled => return Ok(source.to_string()),
        };
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| eyre!("empty formatter command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .wrap_err_with(|| format!("Failed to start `{program}`"))?;

        // Written from a separate thread so a full stdout pipe cannot block us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| eyre!("`{program}` has no stdin"))?;
        let input = source.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .wrap_err_with(|| format!("Failed to wait for `{program}`"))?;
        match writer.join() {
            Ok(result) => result.wrap_err_with(|| format!("Failed to write to `{program}`"))?,
            Err(_) => bail!("writer thread for `{program}` panicked"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{program}` failed ({}): {}", output.status, stderr.trim());
        }
        String::from_utf8(output.stdout)
            .wrap_err_with(|| format!("`{program}` produced invalid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = Config::default();
        assert_eq!(
            Formatter::from_config(&config, false),
            Formatter::Command(vec!["gofmt".to_string()])
        );
        assert_eq!(Formatter::from_config(&config, true), Formatter::Disabled);

        let none = Config {
            formatter: "none".to_string(),
            ..Config::default()
        };
        assert!(!Formatter::from_config(&none, false).is_enabled());
    }

    #[test]
    fn test_command_splits_arguments() {
        assert_eq!(
            Formatter::command("goimports -local example.com"),
            Formatter::Command(vec![
                "goimports".to_string(),
                "-local".to_string(),
                "example.com".to_string()
            ])
        );
        assert_eq!(Formatter::command("   "), Formatter::Disabled);
    }

    #[test]
    fn test_disabled_returns_input() {
        let out = Formatter::Disabled.format("package x\n").unwrap();
        assert_eq!(out, "package x\n");
    }

    #[test]
    fn test_missing_program_is_error() {
        let err = Formatter::command("gobok-no-such-formatter")
            .format("package x\n")
            .unwrap_err();
        assert!(err.to_string().contains("gobok-no-such-formatter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipes_through_command() {
        let out = Formatter::command("cat").format("package x\n").unwrap();
        assert_eq!(out, "package x\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_error() {
        let err = Formatter::command("false").format("package x\n").unwrap_err();
        assert!(err.to_string().contains("`false` failed"));
    }
}
