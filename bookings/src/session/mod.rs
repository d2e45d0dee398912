//! Expiring key/value session storage.
//!
//! The reservation workflow stages its state between request boundaries in
//! a [`SessionStore`]. Entries are keyed by session token and key, carry an
//! explicit time-to-live, and read as absent once expired.
//!
//! Two stores are provided: [`InMemorySessionStore`] for tests and
//! single-process use, and [`crate::database::SqliteSessionStore`], which
//! keeps entries in the bookings database so a staged draft survives
//! across process invocations.

mod memory;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use memory::InMemorySessionStore;

/// Identifies one guest's session.
///
/// Tokens are opaque, non-empty, and contain no whitespace.
///
/// # Examples
///
/// ```
/// use bookings::SessionToken;
///
/// let token: SessionToken = "guest-42".parse().unwrap();
/// assert_eq!(token.as_str(), "guest-42");
/// assert!("".parse::<SessionToken>().is_err());
/// assert!("two words".parse::<SessionToken>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a token after validating it.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the token is empty or contains
    /// whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Validation {
                field: "session".into(),
                message: "session token cannot be empty".into(),
            });
        }
        if token.chars().any(char::is_whitespace) {
            return Err(Error::Validation {
                field: "session".into(),
                message: "session token cannot contain whitespace".into(),
            });
        }
        Ok(Self(token))
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.0
    }
}

impl FromStr for SessionToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key/value storage scoped by session token, with per-entry expiry.
pub trait SessionStore {
    /// Reads a value. Expired or missing entries return `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<String>>;

    /// Writes a value that expires after `ttl`, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn put(&self, token: &SessionToken, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Deletes an entry. Returns `true` if a live entry was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn remove(&self, token: &SessionToken, key: &str) -> Result<bool>;

    /// Deletes every expired entry and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn purge_expired(&self) -> Result<usize>;
}

/// JSON helpers for any [`SessionStore`].
pub trait SessionStoreExt: SessionStore {
    /// Reads and decodes a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the stored payload does not decode, or
    /// any error from the store.
    fn get_json<T: DeserializeOwned>(&self, token: &SessionToken, key: &str) -> Result<Option<T>> {
        match self.get(token, key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::Session {
                    details: format!("corrupt session value for '{key}': {e}"),
                }),
            None => Ok(None),
        }
    }

    /// Encodes a value as JSON and stores it.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store fails.
    fn put_json<T: Serialize>(
        &self,
        token: &SessionToken,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put(token, key, &raw, ttl)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}
