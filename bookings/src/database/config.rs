//! Database configuration and path resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "BOOKINGS_DATA_DIR";

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "bookings.db";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use bookings::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/bookings.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert_eq!(config.busy_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a connection waits on a locked database.
    pub busy_timeout: Duration,
    /// Whether to create the database file and its directory if missing.
    pub auto_create: bool,
    /// Whether to open the database read-only.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5s busy timeout, auto-create on, and
    /// read-write access.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Disables creating a missing database.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Opens the database read-only. Implies no auto-create.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.bookings`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".bookings"))
        .ok_or_else(|| Error::Validation {
            field: "home_directory".into(),
            message: "Cannot determine home directory".into(),
        })
}

/// Resolves the database path.
///
/// 1. `$BOOKINGS_DATA_DIR/bookings.db` if the variable is set
/// 2. `~/.bookings/bookings.db` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `BOOKINGS_DATA_DIR` is not set.
pub fn resolve_database_path() -> Result<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) => Ok(PathBuf::from(dir).join(DATABASE_FILE)),
        None => Ok(default_data_dir()?.join(DATABASE_FILE)),
    }
}
