//! Cancel command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{with_workflow, GlobalOptions, SessionArgs};

/// Abandon the guest's booking and discard the staged draft.
#[derive(Args)]
pub struct CancelCommand {
    #[command(flatten)]
    pub session: SessionArgs,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        with_workflow(global, &self.session, |workflow, _| {
            let state = workflow.cancel()?;
            if !global.quiet {
                println!("Session {}: {state}", workflow.token());
            }
            Ok(())
        })
    }
}
