//! Search command implementation.

use std::time::Duration;

use clap::Args;
use serde_json::json;

use bookings::config::OutputFormat;
use bookings::Deadline;

use crate::error::CliError;
use crate::utils::{
    print_json, resolve_format, with_workflow, FormatArg, GlobalOptions, SessionArgs, StayArgs,
};

/// Find rooms free over a stay and remember them for `select`.
#[derive(Args)]
pub struct SearchCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(flatten)]
    pub stay: StayArgs,

    /// Give up after this many seconds (defaults to the configured timeout)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,
}

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let stay = self.stay.stay()?;
        with_workflow(global, &self.session, |workflow, config| {
            let timeout = self
                .timeout
                .map(Duration::from_secs)
                .or_else(|| config.booking_timeout());
            let deadline = timeout.map_or_else(Deadline::none, Deadline::after);
            let rooms = workflow.search(stay, deadline)?;
            match resolve_format(self.format, config) {
                OutputFormat::Json => print_json(&json!({ "stay": stay, "rooms": rooms })),
                OutputFormat::Human => {
                    if rooms.is_empty() {
                        println!("No availability for {stay}");
                    } else {
                        println!("Available for {stay}:");
                        for room in &rooms {
                            println!("  {room}");
                        }
                    }
                    Ok(())
                }
            }
        })
    }
}
