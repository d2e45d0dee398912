//! Book-room command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{parse_room, with_workflow, GlobalOptions, SessionArgs, StayArgs};

/// Pick a room directly, without a prior search.
#[derive(Args)]
pub struct BookRoomCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Room to book
    #[arg(long, value_name = "ID")]
    pub room: String,

    #[command(flatten)]
    pub stay: StayArgs,
}

impl BookRoomCommand {
    /// Execute the book-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let room = parse_room(&self.room)?;
        let stay = self.stay.stay()?;
        with_workflow(global, &self.session, |workflow, _| {
            let draft = workflow.book_room(room, stay)?;
            if !global.quiet {
                println!("Selected {} for {}", draft.room(), draft.stay());
            }
            Ok(())
        })
    }
}
