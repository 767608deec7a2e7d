//! Command execution implementations

use super::Commands;
use crate::batch::Batch;
use crate::cli::report;
use crate::settings::Settings;

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the arguments do not resolve to a runnable batch.
    /// Failures of individual files are reported, not returned.
    pub fn execute(&self, settings: Settings, quiet: bool) -> anyhow::Result<()> {
        let verbosity = settings.verbosity;
        let batch = Batch::new(settings, self.target(), self.operation())?;
        report::run(&batch, verbosity, quiet);
        Ok(())
    }
}
