//! Sweep-sessions command implementation.

use clap::Args;

use bookings::SessionStore;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Delete expired session entries.
#[derive(Args)]
pub struct SweepSessionsCommand {}

impl SweepSessionsCommand {
    /// Execute the sweep-sessions command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let purged = db.session_store()?.purge_expired()?;
        if !global.quiet {
            let noun = if purged == 1 { "entry" } else { "entries" };
            println!("Removed {purged} expired session {noun}");
        }
        Ok(())
    }
}
