//! Confirm command implementation.

use std::time::Duration;

use clap::Args;

use bookings::config::OutputFormat;
use bookings::{Deadline, WorkflowState};

use crate::error::CliError;
use crate::utils::{
    print_json, resolve_format, with_workflow, FormatArg, GlobalOptions, SessionArgs,
};

/// Book the staged room.
#[derive(Args)]
pub struct ConfirmCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Give up after this many seconds (defaults to the configured timeout)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        with_workflow(global, &self.session, |workflow, config| {
            let timeout = self
                .timeout
                .map(Duration::from_secs)
                .or_else(|| config.booking_timeout());
            let deadline = timeout.map_or_else(Deadline::none, Deadline::after);

            match workflow.confirm(deadline) {
                Ok(summary) => {
                    match resolve_format(self.format, config) {
                        OutputFormat::Json => print_json(&summary)?,
                        OutputFormat::Human => println!("{summary}"),
                    }
                    Ok(())
                }
                Err(e) => {
                    if let (false, Ok(WorkflowState::RoomsFound { rooms, .. })) =
                        (global.quiet, workflow.state())
                    {
                        eprintln!("Returned to search results; {} room(s) still free", rooms.len());
                    }
                    Err(e.into())
                }
            }
        })
    }
}
