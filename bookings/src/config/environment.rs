//! `BOOKINGS_*` environment variable overrides.

use std::env;
use std::str::FromStr;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use bookings::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value of the wrong type.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(minutes) = Self::parse_number("BOOKINGS_SESSION_TTL_MINUTES")? {
            config.session_ttl_minutes = Some(minutes);
        }

        if let Some(seconds) = Self::parse_number("BOOKINGS_MAXIMUM_LOCK_WAIT_SECONDS")? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }

        if let Some(seconds) = Self::parse_number("BOOKINGS_BOOKING_TIMEOUT_SECONDS")? {
            config.booking_timeout_seconds = Some(seconds);
        }

        if let Some(length) = Self::parse_number("BOOKINGS_MIN_FIRST_NAME_LENGTH")? {
            config.min_first_name_length = Some(length);
        }

        if let Ok(val) = env::var("BOOKINGS_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("BOOKINGS_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("BOOKINGS_OUTPUT_FORMAT") {
            config.output_format = Some(Self::parse_output_format(&val)?);
        }

        Ok(())
    }

    fn parse_number<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(value) => value.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: name.into(),
                message: "Must be a non-negative integer".into(),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_output_format(s: &str) -> Result<OutputFormat> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::Validation {
                field: "BOOKINGS_OUTPUT_FORMAT".into(),
                message: format!("Unknown output format '{s}' (expected human or json)"),
            }),
        }
    }
}
