//! Session entries persisted in the bookings database.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::error::{Error, Result};
use crate::session::{SessionStore, SessionToken};

use super::config::DatabaseConfig;
use super::connection::{configure_connection, Database};

const SELECT_LIVE_VALUE: &str = r"
    SELECT value FROM sessions
    WHERE token = ?1 AND key = ?2 AND expires_at > ?3
";

const UPSERT_VALUE: &str = r"
    INSERT INTO sessions (token, key, value, expires_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(token, key) DO UPDATE SET
        value = excluded.value,
        expires_at = excluded.expires_at
";

const DELETE_LIVE_VALUE: &str = r"
    DELETE FROM sessions
    WHERE token = ?1 AND key = ?2 AND expires_at > ?3
";

const DELETE_VALUE: &str = "DELETE FROM sessions WHERE token = ?1 AND key = ?2";

const DELETE_EXPIRED: &str = "DELETE FROM sessions WHERE expires_at <= ?";

#[allow(clippy::cast_possible_truncation)]
fn unix_millis(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|e| Error::Session {
            details: format!("clock is before the Unix epoch: {e}"),
        })
}

/// A [`SessionStore`] backed by the `sessions` table.
///
/// Uses its own connection to the bookings database so a workflow can hold
/// the store while the repository takes write transactions.
#[derive(Debug)]
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    /// Opens the session table of an existing bookings database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataDirectoryNotFound`] if the database file does not
    /// exist, or an error if it cannot be opened.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            return Err(Error::DataDirectoryNotFound {
                path: config.path.clone(),
            });
        }
        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure_connection(&conn, config.busy_timeout, false)?;
        Ok(Self { conn })
    }
}

impl Database {
    /// Opens a session store on the same database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the second connection cannot be opened.
    pub fn session_store(&self) -> Result<SqliteSessionStore> {
        SqliteSessionStore::open(&self.config)
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<String>> {
        let now = unix_millis(SystemTime::now())?;
        Ok(self
            .conn
            .query_row(SELECT_LIVE_VALUE, params![token.as_str(), key, now], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn put(&self, token: &SessionToken, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = unix_millis(SystemTime::now())?.saturating_add(ttl_millis);
        self.conn
            .execute(UPSERT_VALUE, params![token.as_str(), key, value, expires_at])?;
        Ok(())
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<bool> {
        let now = unix_millis(SystemTime::now())?;
        let live = self
            .conn
            .execute(DELETE_LIVE_VALUE, params![token.as_str(), key, now])?;
        // Clear an expired leftover too.
        self.conn.execute(DELETE_VALUE, params![token.as_str(), key])?;
        Ok(live > 0)
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = unix_millis(SystemTime::now())?;
        let purged = self.conn.execute(DELETE_EXPIRED, [now])?;
        log::debug!("purged {purged} expired session entries");
        Ok(purged)
    }
}
