//! The guest booking flow: search, select, enter details, confirm.
//!
//! A [`ReservationWorkflow`] is built per request from explicit context: a
//! repository, a session store, the guest's session token and the
//! [`WorkflowSettings`]. The in-progress [`WorkflowState`] lives in the
//! session store under [`WORKFLOW_KEY`] with a TTL, so consecutive requests
//! (or CLI invocations) pick up where the last one stopped. A missing or
//! expired entry reads as [`WorkflowState::Searching`].
//!
//! Only [`ReservationWorkflow::confirm`] writes reservation data.
//!
//! # Examples
//!
//! ```
//! use bookings::{
//!     Deadline, FormValues, InMemoryRepository, InMemorySessionStore, ReservationWorkflow,
//!     Room, RoomId, SessionToken, StayRange, WorkflowSettings,
//! };
//!
//! let mut repo = InMemoryRepository::with_rooms([
//!     Room::new(RoomId::try_from(1).unwrap(), "General's Quarters"),
//! ]);
//! let sessions = InMemorySessionStore::new();
//! let token = SessionToken::new("guest").unwrap();
//! let settings = WorkflowSettings::default();
//! let mut flow = ReservationWorkflow::new(&mut repo, &sessions, token, settings);
//!
//! let stay = StayRange::parse("2050-01-01", "2050-01-03").unwrap();
//! let rooms = flow.search(stay, Deadline::none()).unwrap();
//! flow.select(rooms[0].id).unwrap();
//! flow.submit_details(&FormValues::from_pairs([
//!     ("first_name", "Tal"),
//!     ("last_name", "Drori"),
//!     ("email", "tal@drori.com"),
//!     ("phone", "555-555-5555"),
//! ]))
//! .unwrap();
//! let summary = flow.confirm(Deadline::none()).unwrap();
//! assert_eq!(summary.room.name, "General's Quarters");
//! ```

mod state;

use std::time::Duration;

use crate::error::{Error, Result};
use crate::forms::FormValues;
use crate::repository::{missing_room, room_taken, BookingRepository, Deadline};
use crate::reservation::{fields, DraftReservation, GuestDetails};
use crate::room::{Room, RoomId};
use crate::session::{SessionStore, SessionStoreExt, SessionToken};
use crate::stay::StayRange;

pub use state::{BookingSummary, WorkflowState};

/// Session key holding the workflow state.
pub const WORKFLOW_KEY: &str = "reservation_workflow";

/// Tunables for the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// How long a staged state survives without activity.
    pub session_ttl: Duration,
    /// Minimum characters in a guest's first name.
    pub min_first_name_length: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(24 * 60 * 60),
            min_first_name_length: 3,
        }
    }
}

/// One guest's booking flow.
///
/// Terminal outcomes (`Confirmed`, `Abandoned`) are not persisted: the
/// session entry is removed, so a later workflow for the same token starts
/// again at `Searching`. This value remembers the outcome and refuses
/// further steps. If removal fails after a booking commits, `Confirmed` is
/// stored instead until the entry expires or is cancelled.
pub struct ReservationWorkflow<'a, R, S>
where
    R: BookingRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    repo: &'a mut R,
    sessions: &'a S,
    token: SessionToken,
    settings: WorkflowSettings,
    outcome: Option<WorkflowState>,
}

impl<'a, R, S> ReservationWorkflow<'a, R, S>
where
    R: BookingRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    /// Creates a workflow over explicit context.
    pub fn new(
        repo: &'a mut R,
        sessions: &'a S,
        token: SessionToken,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            repo,
            sessions,
            token,
            settings,
            outcome: None,
        }
    }

    /// Returns the session token.
    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Returns the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or holds a corrupt entry.
    pub fn state(&self) -> Result<WorkflowState> {
        match &self.outcome {
            Some(outcome) => Ok(outcome.clone()),
            None => self.load(),
        }
    }

    /// Searches for rooms free over `stay`.
    ///
    /// Allowed from `Searching` and `RoomsFound`. An empty result still
    /// moves to `RoomsFound`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] from other states,
    /// [`Error::Timeout`] once `deadline` has passed, or the repository
    /// error. The state is unchanged on any error.
    pub fn search(&mut self, stay: StayRange, deadline: Deadline) -> Result<Vec<Room>> {
        let current = self.current("search")?;
        if !matches!(
            current,
            WorkflowState::Searching | WorkflowState::RoomsFound { .. }
        ) {
            return Err(invalid(&current, "search"));
        }

        let rooms = self.repo.search_available_rooms(&stay, deadline)?;
        log::debug!("session {}: {} room(s) free for {stay}", self.token, rooms.len());
        self.save(&WorkflowState::RoomsFound {
            stay,
            rooms: rooms.clone(),
        })?;
        Ok(rooms)
    }

    /// Picks one of the rooms from the last search.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`] if `room_id` was not in the
    /// results, or [`Error::InvalidTransition`] outside `RoomsFound`.
    pub fn select(&mut self, room_id: RoomId) -> Result<DraftReservation> {
        let current = self.current("select a room")?;
        let (stay, rooms) = match current {
            WorkflowState::RoomsFound { stay, rooms } => (stay, rooms),
            other => return Err(invalid(&other, "select a room")),
        };

        let room = rooms
            .into_iter()
            .find(|room| room.id == room_id)
            .ok_or(Error::InvalidSelection { room_id })?;
        let draft = DraftReservation::new(room, stay);
        self.save(&WorkflowState::RoomSelected {
            draft: draft.clone(),
        })?;
        Ok(draft)
    }

    /// Picks a room directly, without a prior search.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the room does not exist,
    /// [`Error::Conflict`] if it is not free, or
    /// [`Error::InvalidTransition`] outside `Searching`/`RoomsFound`.
    pub fn book_room(&mut self, room_id: RoomId, stay: StayRange) -> Result<DraftReservation> {
        let current = self.current("book a room")?;
        if !matches!(
            current,
            WorkflowState::Searching | WorkflowState::RoomsFound { .. }
        ) {
            return Err(invalid(&current, "book a room"));
        }

        let room = self.repo.get_room(room_id)?.ok_or_else(|| missing_room(room_id))?;
        if !self.repo.is_room_available(room_id, &stay)? {
            return Err(room_taken(room_id, &stay));
        }

        let draft = DraftReservation::new(room, stay);
        self.save(&WorkflowState::RoomSelected {
            draft: draft.clone(),
        })?;
        Ok(draft)
    }

    /// Validates guest details and attaches them to the draft.
    ///
    /// Allowed from `RoomSelected`, and from `DetailsCollected` to correct
    /// details. A posted `room_id` must match the selected room.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Form`] with per-field messages and stays put, or
    /// [`Error::InvalidTransition`] from other states.
    pub fn submit_details(&mut self, values: &FormValues) -> Result<DraftReservation> {
        let current = self.current("submit details")?;
        let draft = match current {
            WorkflowState::RoomSelected { draft } | WorkflowState::DetailsCollected { draft } => {
                draft
            }
            other => return Err(invalid(&other, "submit details")),
        };

        let mut form = GuestDetails::validate(values, self.settings.min_first_name_length);
        if values.contains(fields::ROOM_ID) && form.is_positive_integer(fields::ROOM_ID) {
            let posted = form.get(fields::ROOM_ID);
            if posted != draft.room_id().to_string() {
                form.add_error(fields::ROOM_ID, "This room is not the one selected");
            }
        }
        if !form.valid() {
            return Err(Error::Form(form.into_errors()));
        }

        let draft = draft.with_guest(GuestDetails::from_valid_form(&form));
        self.save(&WorkflowState::DetailsCollected {
            draft: draft.clone(),
        })?;
        Ok(draft)
    }

    /// Persists the booking.
    ///
    /// On success the session entry is removed. On any failure the flow
    /// returns to `RoomsFound` for the draft's stay with the rooms
    /// re-queried (empty if that query also fails), and the error is
    /// returned. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns the booking error ([`Error::Conflict`], a storage error,
    /// [`Error::Timeout`] or [`Error::Validation`]), or
    /// [`Error::InvalidTransition`] outside `DetailsCollected`.
    pub fn confirm(&mut self, deadline: Deadline) -> Result<BookingSummary> {
        let current = self.current("confirm")?;
        let draft = match current {
            WorkflowState::DetailsCollected { draft } => draft,
            other => return Err(invalid(&other, "confirm")),
        };
        let guest = draft.require_guest()?.clone();

        match self.repo.create_reservation(&draft, deadline) {
            Ok(reservation_id) => {
                let summary = BookingSummary {
                    reservation_id,
                    room: draft.room().clone(),
                    stay: draft.stay(),
                    guest,
                };
                let confirmed = WorkflowState::Confirmed {
                    summary: summary.clone(),
                };
                // The booking is committed; cleanup failures must not hide it.
                if let Err(e) = self.sessions.remove(&self.token, WORKFLOW_KEY) {
                    log::warn!(
                        "session {}: reservation {reservation_id} saved but session cleanup failed: {e}",
                        self.token
                    );
                    // Leave a terminal entry so a reloaded flow cannot confirm twice.
                    if let Err(e) = self.save(&confirmed) {
                        log::warn!("session {}: could not record confirmation: {e}", self.token);
                    }
                }
                log::info!("session {}: reservation {reservation_id} confirmed", self.token);
                self.outcome = Some(confirmed);
                Ok(summary)
            }
            Err(err) => {
                log::warn!("session {}: booking failed: {err}", self.token);
                let stay = draft.stay();
                let rooms = self
                    .repo
                    .search_available_rooms(&stay, Deadline::none())
                    .unwrap_or_else(|e| {
                        log::warn!("session {}: re-search failed: {e}", self.token);
                        Vec::new()
                    });
                self.save(&WorkflowState::RoomsFound { stay, rooms })?;
                Err(err)
            }
        }
    }

    /// Abandons the flow and discards the staged draft. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub fn cancel(&mut self) -> Result<WorkflowState> {
        if self.sessions.remove(&self.token, WORKFLOW_KEY)? {
            log::info!("session {}: booking abandoned", self.token);
        }
        if !matches!(self.outcome, Some(WorkflowState::Confirmed { .. })) {
            self.outcome = Some(WorkflowState::Abandoned);
        }
        self.state()
    }

    fn load(&self) -> Result<WorkflowState> {
        Ok(self
            .sessions
            .get_json(&self.token, WORKFLOW_KEY)?
            .unwrap_or(WorkflowState::Searching))
    }

    fn save(&self, state: &WorkflowState) -> Result<()> {
        self.sessions
            .put_json(&self.token, WORKFLOW_KEY, state, self.settings.session_ttl)
    }

    fn current(&self, action: &str) -> Result<WorkflowState> {
        let state = self.state()?;
        if state.is_terminal() {
            return Err(invalid(&state, action));
        }
        Ok(state)
    }
}

fn invalid(state: &WorkflowState, action: &str) -> Error {
    Error::InvalidTransition {
        state: state.name().to_string(),
        action: action.to_string(),
    }
}

#[cfg(test)]
mod tests;
