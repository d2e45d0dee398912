use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::repository::{AvailabilityRepository, InMemoryRepository};
use crate::session::InMemorySessionStore;
use chrono::NaiveDate;

fn room_id(id: i64) -> RoomId {
    RoomId::try_from(id).unwrap()
}

fn stay(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

fn repo() -> InMemoryRepository {
    InMemoryRepository::with_rooms([
        Room::new(room_id(1), "General's Quarters"),
        Room::new(room_id(2), "Major's Suite"),
    ])
}

fn token() -> SessionToken {
    SessionToken::new("guest-1").unwrap()
}

fn details() -> FormValues {
    FormValues::from_pairs([
        ("first_name", "Tal"),
        ("last_name", "Drori"),
        ("email", "tal@drori.com"),
        ("phone", "555-555-5555"),
    ])
}

fn workflow<'a>(
    repo: &'a mut InMemoryRepository,
    sessions: &'a InMemorySessionStore,
) -> ReservationWorkflow<'a, InMemoryRepository, InMemorySessionStore> {
    ReservationWorkflow::new(repo, sessions, token(), WorkflowSettings::default())
}

#[test]
fn test_happy_path() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let s = stay("2050-01-01", "2050-01-03");

    let summary = {
        let mut flow = workflow(&mut repo, &sessions);
        assert_eq!(flow.state().unwrap(), WorkflowState::Searching);

        let rooms = flow.search(s, Deadline::none()).unwrap();
        assert_eq!(rooms.len(), 2);
        assert!(matches!(flow.state().unwrap(), WorkflowState::RoomsFound { .. }));

        flow.select(room_id(1)).unwrap();
        assert!(matches!(flow.state().unwrap(), WorkflowState::RoomSelected { .. }));

        let draft = flow.submit_details(&details()).unwrap();
        assert_eq!(draft.guest().unwrap().first_name, "Tal");

        let summary = flow.confirm(Deadline::none()).unwrap();
        assert!(matches!(flow.state().unwrap(), WorkflowState::Confirmed { .. }));
        summary
    };

    assert_eq!(summary.room.id, room_id(1));
    assert_eq!(summary.stay, s);
    assert!(!repo.is_room_available(room_id(1), &s).unwrap());
    assert!(sessions.get(&token(), WORKFLOW_KEY).unwrap().is_none());

    // A new flow for the same token starts over.
    let flow = workflow(&mut repo, &sessions);
    assert_eq!(flow.state().unwrap(), WorkflowState::Searching);
}

#[test]
fn test_state_survives_between_workflow_values() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    workflow(&mut repo, &sessions)
        .search(stay("2050-01-01", "2050-01-03"), Deadline::none())
        .unwrap();
    workflow(&mut repo, &sessions).select(room_id(2)).unwrap();

    let state = workflow(&mut repo, &sessions).state().unwrap();
    assert_eq!(state.draft().unwrap().room_id(), room_id(2));
}

#[test]
fn test_empty_search_then_selection_fails() {
    let mut repo = repo();
    let s = stay("2050-01-01", "2050-01-03");
    repo.block_room(room_id(1), &s, Deadline::none()).unwrap();
    repo.block_room(room_id(2), &s, Deadline::none()).unwrap();

    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    assert!(flow.search(s, Deadline::none()).unwrap().is_empty());
    assert!(matches!(
        flow.state().unwrap(),
        WorkflowState::RoomsFound { ref rooms, .. } if rooms.is_empty()
    ));
    assert!(matches!(
        flow.select(room_id(1)).unwrap_err(),
        Error::InvalidSelection { .. }
    ));
}

#[test]
fn test_select_room_not_in_results() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    let err = flow.select(room_id(7)).unwrap_err();
    assert!(matches!(err, Error::InvalidSelection { room_id: id } if id == room_id(7)));
    assert!(matches!(flow.state().unwrap(), WorkflowState::RoomsFound { .. }));
}

#[test]
fn test_search_storage_error_leaves_state() {
    let mut repo = repo();
    repo.fail_queries_from(NaiveDate::from_ymd_opt(2060, 1, 1).unwrap());
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    let err = flow.search(stay("2060-01-01", "2060-01-02"), Deadline::none()).unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));
    assert_eq!(flow.state().unwrap(), WorkflowState::Searching);
}

#[test]
fn test_search_past_deadline_leaves_state() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);

    let err = flow
        .search(stay("2050-01-01", "2050-01-03"), Deadline::after(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert_eq!(flow.state().unwrap(), WorkflowState::Searching);

    let s = stay("2050-02-01", "2050-02-03");
    flow.search(s, Deadline::none()).unwrap();
    let before = flow.state().unwrap();
    let err = flow
        .search(stay("2050-03-01", "2050-03-03"), Deadline::after(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert_eq!(flow.state().unwrap(), before);
    assert!(matches!(before, WorkflowState::RoomsFound { stay, .. } if stay == s));
}

#[test]
fn test_wrong_state_is_invalid_transition() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);

    assert!(matches!(
        flow.select(room_id(1)).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
    assert!(matches!(
        flow.submit_details(&details()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
    let err = flow.confirm(Deadline::none()).unwrap_err();
    assert_eq!(err.to_string(), "cannot confirm while searching");

    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();
    assert!(matches!(
        flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
}

#[test]
fn test_invalid_details_stay_put() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();

    let mut values = details();
    values.set("first_name", "T");
    values.set("email", "not_email");
    match flow.submit_details(&values).unwrap_err() {
        Error::Form(errors) => {
            assert!(errors.get("first_name").is_some());
            assert_eq!(errors.get("email"), Some("Invalid email address"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(flow.state().unwrap(), WorkflowState::RoomSelected { .. }));
}

#[test]
fn test_posted_room_id_must_match() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();

    let mut values = details();
    values.set("room_id", "invalid");
    assert!(matches!(flow.submit_details(&values), Err(Error::Form(_))));

    values.set("room_id", "2");
    assert!(matches!(flow.submit_details(&values), Err(Error::Form(_))));

    values.set("room_id", "1");
    flow.submit_details(&values).unwrap();
}

#[test]
fn test_details_can_be_corrected() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();
    flow.submit_details(&details()).unwrap();

    let mut values = details();
    values.set("phone", "555-000-0000");
    let draft = flow.submit_details(&values).unwrap();
    assert_eq!(draft.guest().unwrap().phone, "555-000-0000");
}

#[test]
fn test_min_first_name_length_setting() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let settings = WorkflowSettings {
        min_first_name_length: 5,
        ..WorkflowSettings::default()
    };
    let mut flow = ReservationWorkflow::new(&mut repo, &sessions, token(), settings);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();
    assert!(flow.submit_details(&details()).is_err());
}

#[test]
fn test_conflict_on_confirm_returns_to_rooms_found() {
    let mut repo = repo();
    let mut rival = repo.clone();
    let sessions = InMemorySessionStore::new();
    let s = stay("2050-01-01", "2050-01-03");

    let mut flow = workflow(&mut repo, &sessions);
    flow.search(s, Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();
    flow.submit_details(&details()).unwrap();

    // Someone else takes the room between select and confirm.
    rival.block_room(room_id(1), &s, Deadline::none()).unwrap();

    let err = flow.confirm(Deadline::none()).unwrap_err();
    assert!(err.is_conflict());
    match flow.state().unwrap() {
        WorkflowState::RoomsFound { stay: found, rooms } => {
            assert_eq!(found, s);
            assert_eq!(rooms.len(), 1);
            assert_eq!(rooms[0].id, room_id(2));
        }
        other => panic!("unexpected state: {other}"),
    }
}

#[test]
fn test_storage_failure_on_confirm_returns_to_rooms_found() {
    let mut repo = repo();
    repo.fail_reservation_insert_for(room_id(2));
    let sessions = InMemorySessionStore::new();
    let s = stay("2050-01-01", "2050-01-03");

    let mut flow = workflow(&mut repo, &sessions);
    flow.search(s, Deadline::none()).unwrap();
    flow.select(room_id(2)).unwrap();
    flow.submit_details(&details()).unwrap();

    let err = flow.confirm(Deadline::none()).unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));
    assert!(matches!(
        flow.state().unwrap(),
        WorkflowState::RoomsFound { ref rooms, .. } if rooms.len() == 2
    ));
    drop(flow);
    assert_eq!(repo.reservation_count(), 0);
    assert_eq!(repo.restriction_count(), 0);
}

#[test]
fn test_failed_requery_leaves_empty_rooms() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let s = stay("2050-01-01", "2050-01-03");
    repo.fail_restriction_insert_for(room_id(1));

    let mut flow = workflow(&mut repo, &sessions);
    flow.book_room(room_id(1), s).unwrap();
    flow.submit_details(&details()).unwrap();
    drop(flow);

    repo.fail_queries_from(NaiveDate::from_ymd_opt(2050, 1, 1).unwrap());
    let mut flow = workflow(&mut repo, &sessions);
    assert!(flow.confirm(Deadline::none()).is_err());
    assert!(matches!(
        flow.state().unwrap(),
        WorkflowState::RoomsFound { ref rooms, .. } if rooms.is_empty()
    ));
}

#[test]
fn test_timeout_on_confirm() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();
    flow.submit_details(&details()).unwrap();

    let err = flow.confirm(Deadline::after(Duration::ZERO)).unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert!(matches!(flow.state().unwrap(), WorkflowState::RoomsFound { .. }));
}

/// Session store whose `remove` can be switched to fail.
struct FlakyRemoveStore {
    inner: InMemorySessionStore,
    fail_remove: AtomicBool,
}

impl FlakyRemoveStore {
    fn new() -> Self {
        Self {
            inner: InMemorySessionStore::new(),
            fail_remove: AtomicBool::new(false),
        }
    }
}

impl SessionStore for FlakyRemoveStore {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<String>> {
        self.inner.get(token, key)
    }

    fn put(&self, token: &SessionToken, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.inner.put(token, key, value, ttl)
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<bool> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Error::Session {
                details: "store busy".to_string(),
            });
        }
        self.inner.remove(token, key)
    }

    fn purge_expired(&self) -> Result<usize> {
        self.inner.purge_expired()
    }
}

#[test]
fn test_confirm_succeeds_when_session_cleanup_fails() {
    let mut repo = repo();
    let sessions = FlakyRemoveStore::new();
    let s = stay("2050-01-01", "2050-01-03");

    {
        let mut flow =
            ReservationWorkflow::new(&mut repo, &sessions, token(), WorkflowSettings::default());
        flow.book_room(room_id(1), s).unwrap();
        flow.submit_details(&details()).unwrap();
        sessions.fail_remove.store(true, Ordering::SeqCst);

        let summary = flow.confirm(Deadline::none()).unwrap();
        assert_eq!(summary.room.id, room_id(1));
        assert!(matches!(flow.state().unwrap(), WorkflowState::Confirmed { .. }));
        assert!(matches!(
            flow.confirm(Deadline::none()).unwrap_err(),
            Error::InvalidTransition { .. }
        ));
    }
    assert_eq!(repo.reservation_count(), 1);

    // A reloaded flow sees the confirmation and cannot book again.
    let mut flow =
        ReservationWorkflow::new(&mut repo, &sessions, token(), WorkflowSettings::default());
    assert!(matches!(flow.state().unwrap(), WorkflowState::Confirmed { .. }));
    assert!(matches!(
        flow.confirm(Deadline::none()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
    drop(flow);
    assert_eq!(repo.reservation_count(), 1);
}

#[test]
fn test_book_room_directly() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let s = stay("2050-01-01", "2050-01-03");
    let mut flow = workflow(&mut repo, &sessions);

    let err = flow.book_room(room_id(99), s).unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "room_id"));

    let draft = flow.book_room(room_id(2), s).unwrap();
    assert_eq!(draft.room().name, "Major's Suite");
    assert!(matches!(flow.state().unwrap(), WorkflowState::RoomSelected { .. }));
}

#[test]
fn test_book_room_unavailable_is_conflict() {
    let mut repo = repo();
    let s = stay("2050-01-01", "2050-01-03");
    repo.block_room(room_id(1), &s, Deadline::none()).unwrap();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    assert!(flow.book_room(room_id(1), s).unwrap_err().is_conflict());
    assert_eq!(flow.state().unwrap(), WorkflowState::Searching);
}

#[test]
fn test_cancel_is_idempotent_and_discards_draft() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let mut flow = workflow(&mut repo, &sessions);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    flow.select(room_id(1)).unwrap();

    assert_eq!(flow.cancel().unwrap(), WorkflowState::Abandoned);
    assert_eq!(flow.cancel().unwrap(), WorkflowState::Abandoned);
    assert!(matches!(
        flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
    assert!(sessions.is_empty());
    drop(flow);
    assert_eq!(repo.reservation_count(), 0);
}

#[test]
fn test_expired_session_reads_as_searching() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    let settings = WorkflowSettings {
        session_ttl: Duration::ZERO,
        ..WorkflowSettings::default()
    };
    let mut flow = ReservationWorkflow::new(&mut repo, &sessions, token(), settings);
    flow.search(stay("2050-01-01", "2050-01-03"), Deadline::none()).unwrap();
    assert_eq!(flow.state().unwrap(), WorkflowState::Searching);
}

#[test]
fn test_corrupt_session_entry_is_error() {
    let mut repo = repo();
    let sessions = InMemorySessionStore::new();
    sessions
        .put(&token(), WORKFLOW_KEY, "{\"state\":\"bogus\"}", Duration::from_secs(60))
        .unwrap();
    let flow = workflow(&mut repo, &sessions);
    assert!(matches!(flow.state().unwrap_err(), Error::Session { .. }));
}
