//! Stay ranges: half-open calendar-date intervals.
//!
//! A stay covers the nights from `start` up to, but not including, `end`.
//! Two stays overlap iff `s1 < e2 && s2 < e1`, so a guest checking out on a
//! given day never conflicts with one checking in on that day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// ISO date format used for storage and display.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Month-first format accepted from booking forms.
pub const FORM_DATE_FORMAT: &str = "%m/%d/%Y";

/// A validated `[start, end)` date interval with `start < end`.
///
/// # Examples
///
/// ```
/// use bookings::StayRange;
///
/// let stay = StayRange::parse("2050-01-01", "2050-02-01").unwrap();
/// assert_eq!(stay.nights(), 31);
///
/// // Equal or inverted ranges are rejected.
/// assert!(StayRange::parse("2050-01-01", "2050-01-01").is_err());
/// assert!(StayRange::parse("2050-02-01", "2050-01-01").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStayRange")]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawStayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawStayRange> for StayRange {
    type Error = InvalidStayRangeError;

    fn try_from(raw: RawStayRange) -> std::result::Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl StayRange {
    /// Creates a stay range.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is not strictly after `start`.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Self, InvalidStayRangeError> {
        if end <= start {
            return Err(InvalidStayRangeError {
                start,
                end,
                reason: "check-out date must be after check-in date".into(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a stay range from two date strings.
    ///
    /// Both `YYYY-MM-DD` and the form format `MM/DD/YYYY` are accepted.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either date is malformed, or an
    /// invalid-range error if the range is empty or inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Ok(Self::new(start, end)?)
    }

    /// Returns the check-in date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the check-out date (exclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of nights covered.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Checks whether two stays share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

/// Parses a calendar date in `YYYY-MM-DD` or `MM/DD/YYYY` form.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming `field` if the value matches neither
/// format.
///
/// # Examples
///
/// ```
/// use bookings::stay::parse_date;
///
/// let iso = parse_date("start_date", "2050-01-02").unwrap();
/// let form = parse_date("start_date", "01/02/2050").unwrap();
/// assert_eq!(iso, form);
/// assert!(parse_date("start_date", "invalid").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, FORM_DATE_FORMAT))
        .map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("'{value}' is not a valid date (expected YYYY-MM-DD or MM/DD/YYYY)"),
        })
}

/// Error returned when a stay range is empty or inverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStayRangeError {
    /// The requested check-in date.
    pub start: NaiveDate,
    /// The requested check-out date.
    pub end: NaiveDate,
    /// Why the range was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidStayRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid stay {} to {}: {}", self.start, self.end, self.reason)
    }
}

impl std::error::Error for InvalidStayRangeError {}

#[cfg(test)]
mod proptests;
