//! Booking against both repository implementations.
//!
//! Every scenario runs against SQLite and the in-memory repository so the
//! two stay interchangeable behind the traits.

mod common;

use common::{draft, memory_repo, room_id, stay, TestStore};

use bookings::{
    AvailabilityRepository, BookingRepository, Deadline, Error, ErrorCategory, RestrictionKind,
    Room,
};

fn room_ids(rooms: Vec<Room>) -> Vec<i64> {
    rooms.into_iter().map(|room| room.id.value()).collect()
}

fn scenario_book_then_conflict<R: BookingRepository>(repo: &mut R) {
    let room = repo.get_room(room_id(1)).unwrap().unwrap();
    let first = stay("2025-01-01", "2025-01-05");

    let id = repo
        .create_reservation(&draft(&room, first), Deadline::none())
        .unwrap();
    let stored = repo.get_reservation(id).unwrap().unwrap();
    assert_eq!(stored.room_id(), room.id);
    assert_eq!(stored.stay(), first);
    assert!(!stored.processed());

    let restrictions = repo.restrictions_for_room(room.id).unwrap();
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
    assert_eq!(restrictions[0].reservation_id, Some(id));

    let overlapping = stay("2025-01-04", "2025-01-08");
    let err = repo
        .create_reservation(&draft(&room, overlapping), Deadline::none())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);
    assert_eq!(repo.list_reservations().unwrap().len(), 1);

    // Checking out on the 5th frees the room for the 5th.
    let adjacent = stay("2025-01-05", "2025-01-08");
    assert!(repo.is_room_available(room.id, &adjacent).unwrap());
    repo.create_reservation(&draft(&room, adjacent), Deadline::none())
        .unwrap();
    assert_eq!(repo.list_reservations().unwrap().len(), 2);
}

fn scenario_search_and_block<R: BookingRepository>(repo: &mut R) {
    let window = stay("2025-03-01", "2025-03-04");
    let free = repo.search_available_rooms(&window, Deadline::none()).unwrap();
    assert_eq!(room_ids(free), vec![1, 2]);

    repo.block_room(room_id(2), &stay("2025-03-03", "2025-03-10"), Deadline::none())
        .unwrap();
    assert_eq!(room_ids(repo.search_available_rooms(&window, Deadline::none()).unwrap()), vec![1]);

    let room = repo.get_room(room_id(2)).unwrap().unwrap();
    let err = repo
        .create_reservation(&draft(&room, window), Deadline::none())
        .unwrap_err();
    assert!(err.is_conflict());

    let blocks = repo.restrictions_for_room(room_id(2)).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, RestrictionKind::OwnerBlock);
    assert_eq!(blocks[0].reservation_id, None);
}

fn scenario_missing_room<R: BookingRepository>(repo: &mut R) {
    let ghost = Room::new(room_id(99), "Nowhere");
    let err = repo
        .create_reservation(
            &draft(&ghost, stay("2025-05-01", "2025-05-02")),
            Deadline::none(),
        )
        .unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "room_id"));
    assert!(repo.list_reservations().unwrap().is_empty());
}

#[test]
fn test_sqlite_book_then_conflict() {
    let store = TestStore::seeded();
    scenario_book_then_conflict(&mut store.open());
}

#[test]
fn test_memory_book_then_conflict() {
    scenario_book_then_conflict(&mut memory_repo());
}

#[test]
fn test_sqlite_search_and_block() {
    let store = TestStore::seeded();
    scenario_search_and_block(&mut store.open());
}

#[test]
fn test_memory_search_and_block() {
    scenario_search_and_block(&mut memory_repo());
}

#[test]
fn test_sqlite_missing_room() {
    let store = TestStore::seeded();
    scenario_missing_room(&mut store.open());
}

#[test]
fn test_memory_missing_room() {
    scenario_missing_room(&mut memory_repo());
}

#[test]
fn test_sqlite_bookings_survive_reopen() {
    let store = TestStore::seeded();
    let id = {
        let mut db = store.open();
        let room = db.get_room(room_id(1)).unwrap().unwrap();
        db.create_reservation(
            &draft(&room, stay("2025-07-01", "2025-07-03")),
            Deadline::none(),
        )
        .unwrap()
    };

    let db = store.open();
    let reservation = db.get_reservation(id).unwrap().unwrap();
    assert_eq!(reservation.guest().first_name, "Tal");
    assert!(!db
        .is_room_available(room_id(1), &stay("2025-07-02", "2025-07-04"))
        .unwrap());
}

#[test]
fn test_memory_faults_leave_no_partial_writes() {
    let mut repo = memory_repo();
    repo.fail_restriction_insert_for(room_id(1));
    let room = repo.get_room(room_id(1)).unwrap().unwrap();

    let err = repo
        .create_reservation(
            &draft(&room, stay("2025-01-01", "2025-01-02")),
            Deadline::none(),
        )
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Storage);
    assert_eq!(repo.reservation_count(), 0);
    assert_eq!(repo.restriction_count(), 0);
}

#[test]
fn test_expired_deadline_writes_nothing() {
    let store = TestStore::seeded();
    let mut db = store.open();
    let room = db.get_room(room_id(1)).unwrap().unwrap();

    let expired = Deadline::at(std::time::Instant::now());
    let err = db
        .create_reservation(&draft(&room, stay("2025-09-01", "2025-09-02")), expired)
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert!(db.list_reservations().unwrap().is_empty());
    assert!(db.restrictions_for_room(room_id(1)).unwrap().is_empty());
}
