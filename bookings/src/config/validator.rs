//! Configuration validation.

use std::collections::HashSet;

use crate::config::schema::{Config, RoomSeed};
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use bookings::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let zero = Config { session_ttl_minutes: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&zero).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(config: &Config) -> Result<()> {
        Self::positive("session_ttl_minutes", config.session_ttl_minutes)?;
        Self::positive("maximum_lock_wait_seconds", config.maximum_lock_wait_seconds)?;
        Self::positive("booking_timeout_seconds", config.booking_timeout_seconds)?;

        if config.min_first_name_length == Some(0) {
            return Err(Error::Validation {
                field: "min_first_name_length".into(),
                message: "Must be at least 1".into(),
            });
        }

        if let Some(ref rooms) = config.rooms {
            Self::validate_rooms(rooms)?;
        }

        Ok(())
    }

    fn positive(field: &str, value: Option<u64>) -> Result<()> {
        if value == Some(0) {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must be greater than 0".into(),
            });
        }
        Ok(())
    }

    fn validate_rooms(rooms: &[RoomSeed]) -> Result<()> {
        let mut seen = HashSet::new();

        for room in rooms {
            if room.id <= 0 {
                return Err(Error::Validation {
                    field: "rooms".into(),
                    message: format!("Room id {} must be a positive integer", room.id),
                });
            }

            if room.name.trim().is_empty() {
                return Err(Error::Validation {
                    field: "rooms".into(),
                    message: format!("Room {} has an empty name", room.id),
                });
            }

            if !seen.insert(room.id) {
                return Err(Error::Validation {
                    field: "rooms".into(),
                    message: format!("Duplicate room id {}", room.id),
                });
            }
        }

        Ok(())
    }
}
