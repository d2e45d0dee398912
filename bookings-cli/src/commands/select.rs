//! Select command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{parse_room, with_workflow, GlobalOptions, SessionArgs};

/// Pick a room from the last search.
#[derive(Args)]
pub struct SelectCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Room to pick
    #[arg(long, value_name = "ID")]
    pub room: String,
}

impl SelectCommand {
    /// Execute the select command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let room = parse_room(&self.room)?;
        with_workflow(global, &self.session, |workflow, _| {
            let draft = workflow.select(room)?;
            if !global.quiet {
                println!("Selected {} for {}", draft.room(), draft.stay());
            }
            Ok(())
        })
    }
}
