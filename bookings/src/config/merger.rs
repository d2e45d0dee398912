//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use bookings::config::{Config, ConfigMerger};
///
/// let low = Config { session_ttl_minutes: Some(10), ..Default::default() };
/// let high = Config { session_ttl_minutes: Some(20), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.session_ttl_minutes, Some(20));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given lowest precedence first, into a final config.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Scalar fields are overwritten when set. The room list is replaced
    /// as a whole, never combined.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.session_ttl_minutes.is_some() {
            target.session_ttl_minutes = source.session_ttl_minutes;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.booking_timeout_seconds.is_some() {
            target.booking_timeout_seconds = source.booking_timeout_seconds;
        }

        if source.min_first_name_length.is_some() {
            target.min_first_name_length = source.min_first_name_length;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if source.rooms.is_some() {
            target.rooms.clone_from(&source.rooms);
        }
    }
}
