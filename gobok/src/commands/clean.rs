use clap::Args;
use eyre::Result;

use super::{ScanArgs, exit_on_errors};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Preview what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.scan.load_config()?;

        let report = ops::clean(&self.scan.paths, &config, self.dry_run);

        report.render(&mut TerminalOutput::new());
        exit_on_errors(report.has_errors());
        Ok(())
    }
}
