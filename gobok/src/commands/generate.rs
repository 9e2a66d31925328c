use clap::Args;
use eyre::Result;

use super::{ScanArgs, exit_on_errors};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Print the files that would be written instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Fail structures whose field types cannot be reproduced
    #[arg(long)]
    pub strict: bool,

    /// Write output without running the formatter
    #[arg(long)]
    pub no_format: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let mut config = self.scan.load_config()?;
        if self.strict {
            config.strict = true;
        }

        let report = ops::generate(
            &self.scan.paths,
            &config,
            ops::generate::GenerateOptions {
                dry_run: self.dry_run,
                no_format: self.no_format,
            },
        );

        report.render(&mut TerminalOutput::new());
        exit_on_errors(report.has_errors());
        Ok(())
    }
}
