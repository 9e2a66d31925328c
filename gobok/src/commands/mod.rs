mod check;
mod clean;
mod completions;
mod generate;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use clean::CleanCommand;
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use gobok_core::{CONFIG_FILE, Config};

/// Exit with status 1 once a run with error diagnostics has been reported.
fn exit_on_errors(has_errors: bool) {
    if has_errors {
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[command(name = "gobok")]
#[command(version)]
#[command(about = "Generate builders and constructors for annotated Go structs")]
#[command(args_conflicts_with_subcommands = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    // `generate` also runs when no subcommand is given.
    #[command(flatten)]
    generate: GenerateCommand,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Some(Commands::Generate(cmd)) => cmd.run(),
            Some(Commands::Check(cmd)) => cmd.run(),
            Some(Commands::Clean(cmd)) => cmd.run(),
            Some(Commands::Completions(cmd)) => cmd.run(),
            None => self.generate.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write builders and constructors next to annotated structs
    Generate(GenerateCommand),

    /// Scan and report annotated structs without writing anything
    Check(CheckCommand),

    /// Remove generated files from directories without annotated structs
    Clean(CleanCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Roots and configuration shared by every scanning command
#[derive(Args)]
pub struct ScanArgs {
    /// Directories to scan (defaults to the current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to gobok.toml; a missing file means defaults
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,
}

impl ScanArgs {
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config)
    }
}
