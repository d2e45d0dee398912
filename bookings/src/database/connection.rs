//! Database connection management.

use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OpenFlags};

use crate::error::{Error, Result};
use crate::repository::Deadline;

use super::config::DatabaseConfig;

/// A SQLite connection configured for concurrent booking.
///
/// Every process or thread opens its own `Database`. WAL mode lets readers
/// proceed while a writer holds the lock; writers serialize through
/// `BEGIN IMMEDIATE` transactions.
///
/// # Examples
///
/// ```no_run
/// use bookings::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/bookings.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    pub(super) config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection.
    ///
    /// This will create the parent directory if `auto_create` is enabled,
    /// switch to WAL mode, enforce foreign keys, apply the busy timeout,
    /// and initialize or verify the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataDirectoryNotFound`] if the file is missing and
    /// auto-create is disabled, or an error if the file cannot be opened or
    /// the schema is incompatible.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.auto_create {
                return Err(Error::DataDirectoryNotFound {
                    path: config
                        .path
                        .parent()
                        .map_or_else(|| config.path.clone(), std::path::Path::to_path_buf),
                });
            }
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        configure_connection(&conn, config.busy_timeout, config.read_only)?;

        if !config.read_only {
            super::migrations::check_schema_compatibility(&conn)?;
        }

        log::debug!("opened database at {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the configuration this database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Runs SQLite's integrity check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if result != "ok" {
            return Err(Error::DatabaseCorruption { details: result });
        }
        Ok(())
    }

    pub(super) fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// The configured busy timeout, capped at the time left before `deadline`.
    pub(super) fn busy_wait(&self, deadline: Deadline) -> Duration {
        let configured = self.config.busy_timeout;
        deadline
            .remaining()
            .map_or(configured, |remaining| remaining.min(configured))
    }

    /// Puts the configured busy timeout back after a deadline-capped
    /// operation, passing the operation's result through.
    pub(super) fn restore_busy_timeout<T>(&self, result: Result<T>) -> Result<T> {
        keep_result(result, self.set_busy_timeout(self.config.busy_timeout))
    }
}

/// Returns `result` untouched. A failed timeout reset is only logged: the
/// operation before it has already committed or failed on its own.
pub(super) fn keep_result<T>(result: Result<T>, reset: Result<()>) -> Result<T> {
    if let Err(e) = reset {
        log::warn!("could not restore busy timeout: {e}");
    }
    result
}

pub(super) fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// Error for a lock wait that ran out: `Timeout` once the caller's deadline
/// has passed, otherwise `LockTimeout` for the busy wait itself.
pub(super) fn busy_error(deadline: Deadline, waited: Duration) -> Error {
    if deadline.is_expired() {
        Error::Timeout
    } else {
        Error::LockTimeout {
            seconds: waited.as_secs(),
        }
    }
}

pub(super) fn configure_connection(
    conn: &Connection,
    busy_timeout: Duration,
    read_only: bool,
) -> Result<()> {
    if !read_only {
        // journal_mode returns the resulting mode as a row.
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    }
    conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}
