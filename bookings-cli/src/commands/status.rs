//! Status command implementation.

use clap::Args;

use bookings::config::OutputFormat;
use bookings::WorkflowState;

use crate::error::CliError;
use crate::utils::{
    print_json, resolve_format, with_workflow, FormatArg, GlobalOptions, SessionArgs,
};

/// Show where the guest is in the booking flow.
#[derive(Args)]
pub struct StatusCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,
}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        with_workflow(global, &self.session, |workflow, config| {
            let state = workflow.state()?;
            match resolve_format(self.format, config) {
                OutputFormat::Json => print_json(&state),
                OutputFormat::Human => {
                    println!("{state}");
                    match &state {
                        WorkflowState::RoomsFound { stay, rooms } => {
                            println!("  Stay:  {stay}");
                            for room in rooms {
                                println!("  Room:  {room}");
                            }
                        }
                        WorkflowState::RoomSelected { draft }
                        | WorkflowState::DetailsCollected { draft } => {
                            println!("  Stay:  {}", draft.stay());
                            println!("  Room:  {}", draft.room());
                            if let Some(guest) = draft.guest() {
                                println!("  Guest: {} <{}>", guest.full_name(), guest.email);
                            }
                        }
                        _ => {}
                    }
                    Ok(())
                }
            }
        })
    }
}
