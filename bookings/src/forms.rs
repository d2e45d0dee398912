//! Posted-field validation.
//!
//! A [`Form`] wraps the string values submitted by a guest and records a
//! list of messages per field as checks run. The checks never fail fast:
//! every rule is applied and [`Form::valid`] reports whether any message
//! was recorded.
//!
//! # Examples
//!
//! ```
//! use bookings::{Form, FormValues};
//!
//! let values = FormValues::from_pairs([("first_name", "T"), ("email", "not_email")]);
//! let mut form = Form::new(values);
//! form.required(&["first_name", "last_name"]);
//! form.min_length("first_name", 3);
//! form.is_email("email");
//!
//! assert!(!form.valid());
//! assert_eq!(form.errors().get("last_name"), Some("This field cannot be blank"));
//! assert_eq!(form.errors().get("email"), Some("Invalid email address"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Raw string values submitted with a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds values from `(field, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Sets a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Returns a field value, or the empty string when the field is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    /// Returns `true` if the field was posted at all, even if blank.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Records a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns the first message recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns every message recorded for a field.
    #[must_use]
    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over fields and their messages, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A form under validation.
#[derive(Debug, Clone)]
pub struct Form {
    values: FormValues,
    errors: FormErrors,
}

impl Form {
    /// Creates a form with no recorded errors.
    #[must_use]
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    /// Returns the submitted values.
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns the submitted value for a field, trimmed.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).trim()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub const fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Consumes the form and returns the recorded errors.
    #[must_use]
    pub fn into_errors(self) -> FormErrors {
        self.errors
    }

    /// Checks that a field is present and not blank. Records nothing.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Records an error for each field that is missing or blank.
    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if !self.has(field) {
                self.errors.add(*field, "This field cannot be blank");
            }
        }
    }

    /// Checks that a field has at least `length` characters.
    pub fn min_length(&mut self, field: &str, length: usize) -> bool {
        if self.get(field).chars().count() < length {
            self.errors.add(
                field,
                format!("This field must be at least {length} characters long"),
            );
            return false;
        }
        true
    }

    /// Checks that a field holds a well-formed email address.
    pub fn is_email(&mut self, field: &str) -> bool {
        if !self.get(field).validate_email() {
            self.errors.add(field, "Invalid email address");
            return false;
        }
        true
    }

    /// Checks that a field holds a positive integer.
    pub fn is_positive_integer(&mut self, field: &str) -> bool {
        match self.get(field).parse::<i64>() {
            Ok(n) if n > 0 => true,
            _ => {
                self.errors.add(field, "This field must be a positive number");
                false
            }
        }
    }

    /// Records an arbitrary error against a field.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Returns `true` if no check recorded an error.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}
