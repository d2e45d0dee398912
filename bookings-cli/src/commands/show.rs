//! Show command implementation.

use clap::Args;

use bookings::config::OutputFormat;
use bookings::{AvailabilityRepository, Error, ReservationId};

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, open_database, print_json, resolve_format, FormatArg,
    GlobalOptions,
};

/// Display a reservation.
#[derive(Args)]
pub struct ShowCommand {
    /// Reservation id
    #[arg(long)]
    pub id: i64,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let reservation = db
            .get_reservation(ReservationId(self.id))?
            .ok_or_else(|| Error::NotFound {
                resource: format!("reservation {}", self.id),
            })?;

        match resolve_format(self.format, &config) {
            OutputFormat::Json => print_json(&reservation)?,
            OutputFormat::Human => {
                let room = db.get_room(reservation.room_id())?;
                let guest = reservation.guest();
                println!("Reservation {}", reservation.id());
                match room {
                    Some(room) => println!("  Room:    {room}"),
                    None => println!("  Room:    #{}", reservation.room_id()),
                }
                let stay = reservation.stay();
                println!("  Stay:    {stay} ({} nights)", stay.nights());
                println!("  Guest:   {}", guest.full_name());
                println!("  Email:   {}", guest.email);
                println!("  Phone:   {}", guest.phone);
                println!("  Created: {}", format_timestamp(reservation.created_at()));
            }
        }

        Ok(())
    }
}
