//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered on top of
//! each other. Defaults are applied when a value is read, never when a file
//! is parsed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::room::{Room, RoomId};
use crate::workflow::WorkflowSettings;

/// Default lifetime of a staged booking, in minutes.
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 24 * 60;

/// Default minimum length of a guest's first name.
pub const DEFAULT_MIN_FIRST_NAME_LENGTH: usize = 3;

/// Default time to wait for the database write lock, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use bookings::config::{Config, OutputFormat};
///
/// let yaml = "session_ttl_minutes: 30\noutput_format: json\n";
/// let config: Config = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.session_ttl_minutes, Some(30));
/// assert_eq!(config.output_format, Some(OutputFormat::Json));
/// assert_eq!(config.workflow_settings().min_first_name_length, 3);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How long a staged booking survives without activity (minutes).
    pub session_ttl_minutes: Option<u64>,

    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Upper bound on a single confirmation (seconds). Unbounded if unset.
    pub booking_timeout_seconds: Option<u64>,

    /// Minimum characters in a guest's first name.
    pub min_first_name_length: Option<usize>,

    /// Rooms written by `init --seed`.
    pub rooms: Option<Vec<RoomSeed>>,

    /// Disable automatic database creation.
    pub disable_autoinit: Option<bool>,

    /// Output format for listing commands.
    pub output_format: Option<OutputFormat>,
}

/// A room entry in the seed list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoomSeed {
    /// Room identifier; must be positive.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl RoomSeed {
    /// Creates a seed entry.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The two rooms the inn starts with.
#[must_use]
pub fn default_room_seeds() -> Vec<RoomSeed> {
    vec![
        RoomSeed::new(1, "General's Quarters"),
        RoomSeed::new(2, "Major's Suite"),
    ]
}

impl Config {
    /// Session lifetime, falling back to one day.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        let minutes = self
            .session_ttl_minutes
            .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);
        Duration::from_secs(minutes.saturating_mul(60))
    }

    /// Database lock wait, falling back to five seconds.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// Confirmation timeout, if one is configured.
    #[must_use]
    pub fn booking_timeout(&self) -> Option<Duration> {
        self.booking_timeout_seconds.map(Duration::from_secs)
    }

    /// Settings for [`crate::ReservationWorkflow`].
    #[must_use]
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            session_ttl: self.session_ttl(),
            min_first_name_length: self
                .min_first_name_length
                .unwrap_or(DEFAULT_MIN_FIRST_NAME_LENGTH),
        }
    }

    /// The configured seed rooms, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a seed has a non-positive id.
    pub fn seed_rooms(&self) -> Result<Vec<Room>> {
        let seeds = self.rooms.clone().unwrap_or_else(default_room_seeds);
        seeds
            .into_iter()
            .map(|seed| -> Result<Room> { Ok(Room::new(RoomId::try_from(seed.id)?, seed.name)) })
            .collect()
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text for people.
    #[default]
    Human,
    /// JSON for scripts.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}
