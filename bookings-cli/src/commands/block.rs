//! Block command implementation.

use clap::Args;

use bookings::{BookingRepository, Deadline};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_room, GlobalOptions, StayArgs};

/// Hold a room for the owner over a stay.
#[derive(Args)]
pub struct BlockCommand {
    /// Room to block
    #[arg(long, value_name = "ID")]
    pub room: String,

    #[command(flatten)]
    pub stay: StayArgs,
}

impl BlockCommand {
    /// Execute the block command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let room = parse_room(&self.room)?;
        let stay = self.stay.stay()?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let id = db.block_room(room, &stay, Deadline::none())?;
        if !global.quiet {
            println!("Blocked room {room} for {stay} (restriction {id})");
        }
        Ok(())
    }
}
