//! Rooms command implementation.

use clap::Args;

use bookings::config::OutputFormat;
use bookings::AvailabilityRepository;

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_json, resolve_format, FormatArg, GlobalOptions,
};

/// List every room.
#[derive(Args)]
pub struct RoomsCommand {
    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,
}

impl RoomsCommand {
    /// Execute the rooms command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let rooms = db.list_rooms()?;

        match resolve_format(self.format, &config) {
            OutputFormat::Json => print_json(&rooms)?,
            OutputFormat::Human => {
                println!("ID\tNAME");
                for room in &rooms {
                    println!("{}\t{}", room.id, room.name);
                }
            }
        }

        Ok(())
    }
}
