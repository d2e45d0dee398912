//! Init command implementation.

use clap::Args;

use bookings::database::DATABASE_FILE;
use bookings::{Database, DatabaseConfig};

use crate::error::CliError;
use crate::utils::{load_configuration, resolve_data_dir, shorten_path, GlobalOptions};

/// Create the data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Write the configured rooms (or the two default rooms)
    #[arg(long)]
    pub seed: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Ignores `--disable-autoinit`; creating the database is the point.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let data_dir = resolve_data_dir(global)?;
        let db_path = data_dir.join(DATABASE_FILE);
        let existed = db_path.exists();

        let busy_timeout = global
            .busy_timeout
            .map_or_else(|| config.lock_wait(), std::time::Duration::from_secs);
        let mut db = Database::open(DatabaseConfig::new(&db_path).with_busy_timeout(busy_timeout))?;

        if !global.quiet {
            println!("Initialized bookings in: {}", shorten_path(&data_dir));
            if existed {
                println!("  - Database already present");
            } else {
                println!("  - Created database");
            }
        }

        if self.seed {
            let rooms = config.seed_rooms()?;
            let written = db.seed_rooms(&rooms)?;
            if !global.quiet {
                println!("  - Seeded {written} room(s)");
            }
        }

        Ok(())
    }
}
