//! Reservation types: guest details, session-scoped drafts, and persisted
//! reservations.
//!
//! A [`DraftReservation`] is what the workflow stages between steps. Once
//! confirmed, the booking transaction turns it into a [`Reservation`] row
//! plus a restriction holding the room.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forms::{Form, FormValues};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

/// Database identifier of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Form field names for guest details.
pub mod fields {
    /// Guest first name.
    pub const FIRST_NAME: &str = "first_name";
    /// Guest last name.
    pub const LAST_NAME: &str = "last_name";
    /// Guest email address.
    pub const EMAIL: &str = "email";
    /// Guest phone number.
    pub const PHONE: &str = "phone";
    /// Room being booked, when posted with the details.
    pub const ROOM_ID: &str = "room_id";
}

/// Contact details of the guest making a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl GuestDetails {
    /// Validates posted form values and extracts guest details.
    ///
    /// All four fields are required, the email must be well formed, and the
    /// first name must have at least `min_first_name_length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Form`] carrying every failed check.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookings::{FormValues, GuestDetails};
    ///
    /// let values = FormValues::from_pairs([
    ///     ("first_name", "Tal"),
    ///     ("last_name", "Drori"),
    ///     ("email", "tal@drori.com"),
    ///     ("phone", "555-555-5555"),
    /// ]);
    /// let guest = GuestDetails::from_form(&values, 3).unwrap();
    /// assert_eq!(guest.first_name, "Tal");
    /// ```
    pub fn from_form(values: &FormValues, min_first_name_length: usize) -> Result<Self> {
        let form = Self::validate(values, min_first_name_length);
        if !form.valid() {
            return Err(Error::Form(form.into_errors()));
        }
        Ok(Self::from_valid_form(&form))
    }

    /// Runs the guest-detail checks and returns the form with any errors.
    #[must_use]
    pub fn validate(values: &FormValues, min_first_name_length: usize) -> Form {
        let mut form = Form::new(values.clone());
        form.required(&[fields::FIRST_NAME, fields::LAST_NAME, fields::EMAIL, fields::PHONE]);
        if form.has(fields::FIRST_NAME) {
            form.min_length(fields::FIRST_NAME, min_first_name_length);
        }
        if form.has(fields::EMAIL) {
            form.is_email(fields::EMAIL);
        }
        form
    }

    pub(crate) fn from_valid_form(form: &Form) -> Self {
        Self {
            first_name: form.get(fields::FIRST_NAME).to_string(),
            last_name: form.get(fields::LAST_NAME).to_string(),
            email: form.get(fields::EMAIL).to_string(),
            phone: form.get(fields::PHONE).to_string(),
        }
    }

    /// Returns the guest's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A tentative booking staged in the session store.
///
/// Never written to the reservation tables. It is discarded on a successful
/// booking, an explicit cancellation, or when the session entry expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReservation {
    room: Room,
    stay: StayRange,
    guest: Option<GuestDetails>,
}

impl DraftReservation {
    /// Creates a draft for a room and stay with no guest details yet.
    #[must_use]
    pub const fn new(room: Room, stay: StayRange) -> Self {
        Self {
            room,
            stay,
            guest: None,
        }
    }

    /// Returns the draft with guest details attached.
    #[must_use]
    pub fn with_guest(mut self, guest: GuestDetails) -> Self {
        self.guest = Some(guest);
        self
    }

    /// Returns the selected room.
    #[must_use]
    pub const fn room(&self) -> &Room {
        &self.room
    }

    /// Returns the selected room's identifier.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room.id
    }

    /// Returns the requested stay.
    #[must_use]
    pub const fn stay(&self) -> StayRange {
        self.stay
    }

    /// Returns the guest details, if collected.
    #[must_use]
    pub const fn guest(&self) -> Option<&GuestDetails> {
        self.guest.as_ref()
    }

    /// Returns the guest details or a validation error naming the form.
    pub(crate) fn require_guest(&self) -> Result<&GuestDetails> {
        self.guest.as_ref().ok_or_else(|| Error::Validation {
            field: "guest".into(),
            message: "guest details have not been collected".into(),
        })
    }
}

/// A persisted reservation.
///
/// # Examples
///
/// ```
/// use bookings::{GuestDetails, Reservation, ReservationId, RoomId, StayRange};
///
/// let guest = GuestDetails {
///     first_name: "Tal".into(),
///     last_name: "Drori".into(),
///     email: "tal@drori.com".into(),
///     phone: "555".into(),
/// };
/// let stay = StayRange::parse("2050-01-01", "2050-01-03").unwrap();
/// let reservation = Reservation::builder(RoomId::try_from(1).unwrap(), stay, guest)
///     .id(ReservationId(7))
///     .build()
///     .unwrap();
/// assert_eq!(reservation.id(), ReservationId(7));
/// assert!(!reservation.processed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    stay: StayRange,
    guest: GuestDetails,
    processed: bool,
    created_at: SystemTime,
    updated_at: SystemTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(room_id: RoomId, stay: StayRange, guest: GuestDetails) -> ReservationBuilder {
        ReservationBuilder {
            id: None,
            room_id,
            stay,
            guest,
            processed: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the reservation identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the reserved room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the reserved stay.
    #[must_use]
    pub const fn stay(&self) -> StayRange {
        self.stay
    }

    /// Returns the guest details.
    #[must_use]
    pub const fn guest(&self) -> &GuestDetails {
        &self.guest
    }

    /// Returns whether staff have processed the reservation.
    #[must_use]
    pub const fn processed(&self) -> bool {
        self.processed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> SystemTime {
        self.updated_at
    }
}

/// Builder for [`Reservation`] values loaded from storage or constructed in
/// tests.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    room_id: RoomId,
    stay: StayRange,
    guest: GuestDetails,
    processed: bool,
    created_at: Option<SystemTime>,
    updated_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Sets the reservation identifier.
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the processed flag.
    #[must_use]
    pub const fn processed(mut self, processed: bool) -> Self {
        self.processed = processed;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last update timestamp.
    #[must_use]
    pub const fn updated_at(mut self, updated_at: SystemTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if no identifier was set, or if the guest's first
    /// or last name is blank.
    pub fn build(self) -> std::result::Result<Reservation, ValidationError> {
        let Some(id) = self.id else {
            return Err(ValidationError {
                field: "id".into(),
                message: "reservation id must be set".into(),
            });
        };

        for (field, value) in [
            (fields::FIRST_NAME, &self.guest.first_name),
            (fields::LAST_NAME, &self.guest.last_name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError {
                    field: field.into(),
                    message: format!("{field} must be non-empty after trimming whitespace"),
                });
            }
        }

        let now = SystemTime::now();
        let created_at = self.created_at.unwrap_or(now);
        Ok(Reservation {
            id,
            room_id: self.room_id,
            stay: self.stay,
            guest: self.guest,
            processed: self.processed,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
