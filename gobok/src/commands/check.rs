use clap::Args;
use eyre::Result;

use super::{ScanArgs, exit_on_errors};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Fail structures whose field types cannot be reproduced
    #[arg(long)]
    pub strict: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let mut config = self.scan.load_config()?;
        if self.strict {
            config.strict = true;
        }

        let report = ops::check(&self.scan.paths, &config);

        report.render(&mut TerminalOutput::new());
        exit_on_errors(report.has_errors());
        Ok(())
    }
}
