//! An in-process repository for tests and single-process use.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::NaiveDate;
use parking_lot::Mutex;

use super::{missing_room, room_taken, AvailabilityRepository, BookingRepository, Deadline};
use crate::error::{Error, Result};
use crate::reservation::{DraftReservation, Reservation, ReservationId};
use crate::restriction::{Restriction, RestrictionId, RestrictionKind};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

#[derive(Debug, Default)]
struct Faults {
    reservation_insert: HashSet<RoomId>,
    restriction_insert: HashSet<RoomId>,
    queries_from: Option<NaiveDate>,
}

#[derive(Debug, Default)]
struct Inventory {
    rooms: BTreeMap<RoomId, Room>,
    reservations: BTreeMap<ReservationId, Reservation>,
    restrictions: Vec<Restriction>,
    next_reservation_id: i64,
    next_restriction_id: i64,
    faults: Faults,
}

impl Inventory {
    fn check_query(&self, stay: &StayRange) -> Result<()> {
        match self.faults.queries_from {
            Some(from) if stay.start() >= from => Err(Error::Storage {
                details: format!("query for {stay} failed"),
            }),
            _ => Ok(()),
        }
    }

    fn room_is_free(&self, room_id: RoomId, stay: &StayRange) -> bool {
        !self
            .restrictions
            .iter()
            .any(|r| r.room_id == room_id && r.blocks(stay))
    }

    fn next_restriction(&mut self) -> RestrictionId {
        self.next_restriction_id += 1;
        RestrictionId(self.next_restriction_id)
    }

    // Room must exist and be free; the caller holds the lock.
    fn check_bookable(&self, room_id: RoomId, stay: &StayRange) -> Result<()> {
        self.check_query(stay)?;
        if !self.rooms.contains_key(&room_id) {
            return Err(missing_room(room_id));
        }
        if !self.room_is_free(room_id, stay) {
            return Err(room_taken(room_id, stay));
        }
        Ok(())
    }
}

/// A [`BookingRepository`] held in memory.
///
/// Clones share the same inventory, so threads holding clones race against
/// one store. Every check-then-insert runs under a single mutex.
///
/// Faults can be injected per room or by date to exercise failure paths;
/// a failed write leaves no rows behind.
///
/// # Examples
///
/// ```
/// use bookings::{
///     AvailabilityRepository, Deadline, InMemoryRepository, Room, RoomId, StayRange,
/// };
///
/// let repo = InMemoryRepository::with_rooms([
///     Room::new(RoomId::try_from(1).unwrap(), "General's Quarters"),
/// ]);
/// let stay = StayRange::parse("2050-01-01", "2050-01-03").unwrap();
/// assert_eq!(repo.search_available_rooms(&stay, Deadline::none()).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    inventory: Arc<Mutex<Inventory>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with rooms.
    #[must_use]
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let repo = Self::new();
        for room in rooms {
            repo.add_room(room);
        }
        repo
    }

    /// Adds or renames a room.
    pub fn add_room(&self, room: Room) {
        self.inventory.lock().rooms.insert(room.id, room);
    }

    /// Makes every reservation insert for `room_id` fail.
    pub fn fail_reservation_insert_for(&self, room_id: RoomId) {
        self.inventory
            .lock()
            .faults
            .reservation_insert
            .insert(room_id);
    }

    /// Makes every restriction insert for `room_id` fail, after the
    /// reservation row has been staged.
    pub fn fail_restriction_insert_for(&self, room_id: RoomId) {
        self.inventory
            .lock()
            .faults
            .restriction_insert
            .insert(room_id);
    }

    /// Makes availability queries fail for stays starting on or after
    /// `date`.
    pub fn fail_queries_from(&self, date: NaiveDate) {
        self.inventory.lock().faults.queries_from = Some(date);
    }

    /// Returns the number of restrictions of every kind.
    #[must_use]
    pub fn restriction_count(&self) -> usize {
        self.inventory.lock().restrictions.len()
    }

    /// Returns the number of reservations.
    #[must_use]
    pub fn reservation_count(&self) -> usize {
        self.inventory.lock().reservations.len()
    }
}

impl AvailabilityRepository for InMemoryRepository {
    fn is_room_available(&self, room_id: RoomId, stay: &StayRange) -> Result<bool> {
        let inventory = self.inventory.lock();
        inventory.check_query(stay)?;
        Ok(inventory.room_is_free(room_id, stay))
    }

    fn search_available_rooms(&self, stay: &StayRange, deadline: Deadline) -> Result<Vec<Room>> {
        deadline.check()?;
        let inventory = self.inventory.lock();
        inventory.check_query(stay)?;
        Ok(inventory
            .rooms
            .values()
            .filter(|room| inventory.room_is_free(room.id, stay))
            .cloned()
            .collect())
    }

    fn get_room(&self, room_id: RoomId) -> Result<Option<Room>> {
        Ok(self.inventory.lock().rooms.get(&room_id).cloned())
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.inventory.lock().rooms.values().cloned().collect())
    }

    fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Ok(self.inventory.lock().reservations.get(&id).cloned())
    }

    fn list_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.inventory.lock().reservations.values().cloned().collect())
    }

    fn restrictions_for_room(&self, room_id: RoomId) -> Result<Vec<Restriction>> {
        let inventory = self.inventory.lock();
        let mut restrictions: Vec<Restriction> = inventory
            .restrictions
            .iter()
            .filter(|r| r.room_id == room_id)
            .cloned()
            .collect();
        restrictions.sort_by_key(|r| (r.stay.start(), r.id));
        Ok(restrictions)
    }
}

impl BookingRepository for InMemoryRepository {
    fn create_reservation(
        &mut self,
        draft: &DraftReservation,
        deadline: Deadline,
    ) -> Result<ReservationId> {
        let guest = draft.require_guest()?.clone();
        let room_id = draft.room_id();
        let stay = draft.stay();

        let mut inventory = self.inventory.lock();
        inventory.check_bookable(room_id, &stay)?;

        if inventory.faults.reservation_insert.contains(&room_id) {
            return Err(Error::Storage {
                details: format!("cannot insert reservation for room {room_id}"),
            });
        }
        let reservation_id = ReservationId(inventory.next_reservation_id + 1);
        let now = SystemTime::now();
        let reservation = Reservation::builder(room_id, stay, guest)
            .id(reservation_id)
            .created_at(now)
            .updated_at(now)
            .build()?;

        if inventory.faults.restriction_insert.contains(&room_id) {
            return Err(Error::Storage {
                details: format!("cannot insert restriction for room {room_id}"),
            });
        }
        deadline.check()?;

        // Both rows are ready; apply them together.
        inventory.next_reservation_id = reservation_id.0;
        let restriction_id = inventory.next_restriction();
        inventory.reservations.insert(reservation_id, reservation);
        inventory.restrictions.push(Restriction {
            id: restriction_id,
            room_id,
            stay,
            kind: RestrictionKind::Reservation,
            reservation_id: Some(reservation_id),
        });
        log::info!("reserved room {room_id} for {stay} as reservation {reservation_id}");
        Ok(reservation_id)
    }

    fn block_room(
        &mut self,
        room_id: RoomId,
        stay: &StayRange,
        deadline: Deadline,
    ) -> Result<RestrictionId> {
        let mut inventory = self.inventory.lock();
        inventory.check_bookable(room_id, stay)?;
        if inventory.faults.restriction_insert.contains(&room_id) {
            return Err(Error::Storage {
                details: format!("cannot insert restriction for room {room_id}"),
            });
        }
        deadline.check()?;

        let id = inventory.next_restriction();
        inventory.restrictions.push(Restriction {
            id,
            room_id,
            stay: *stay,
            kind: RestrictionKind::OwnerBlock,
            reservation_id: None,
        });
        log::info!("blocked room {room_id} for {stay}");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::reservation::GuestDetails;

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

    fn guest() -> GuestDetails {
        GuestDetails {
            first_name: "Tal".into(),
            last_name: "Drori".into(),
            email: "tal@drori.com".into(),
            phone: "555".into(),
        }
    }

    fn draft(repo: &InMemoryRepository, id: i64, s: StayRange) -> DraftReservation {
        let room = repo.get_room(room_id(id)).unwrap().unwrap();
        DraftReservation::new(room, s).with_guest(guest())
    }

    #[test]
    fn test_create_reservation_holds_room() {
        let mut repo = repo();
        let s = stay("2050-01-01", "2050-02-02");
        let id = repo.create_reservation(&draft(&repo, 1, s), Deadline::none()).unwrap();

        assert!(!repo
            .is_room_available(room_id(1), &stay("2050-01-01", "2050-02-01"))
            .unwrap());
        assert!(repo
            .is_room_available(room_id(1), &stay("2040-01-01", "2040-02-01"))
            .unwrap());

        let restrictions = repo.restrictions_for_room(room_id(1)).unwrap();
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].reservation_id, Some(id));
        assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
        assert_eq!(repo.get_reservation(id).unwrap().unwrap().room_id(), room_id(1));
    }

    #[test]
    fn test_overlapping_booking_conflicts() {
        let mut repo = repo();
        let s = stay("2050-01-01", "2050-01-05");
        repo.create_reservation(&draft(&repo, 1, s), Deadline::none()).unwrap();

        let overlapping = stay("2050-01-04", "2050-01-06");
        let err = repo
            .create_reservation(&draft(&repo, 1, overlapping), Deadline::none())
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.reservation_count(), 1);

        let adjacent = stay("2050-01-05", "2050-01-06");
        assert!(repo
            .create_reservation(&draft(&repo, 1, adjacent), Deadline::none())
            .is_ok());
    }

    #[test]
    fn test_search_excludes_restricted_rooms_in_order() {
        let mut repo = repo();
        let s = stay("2050-01-01", "2050-01-05");
        assert_eq!(
            repo.search_available_rooms(&s, Deadline::none())
                .unwrap()
                .iter()
                .map(|r| r.id.value())
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
        repo.block_room(room_id(1), &s, Deadline::none()).unwrap();
        let rooms = repo.search_available_rooms(&s, Deadline::none()).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, room_id(2));
    }

    #[test]
    fn test_missing_room_is_validation() {
        let mut repo = repo();
        let draft = DraftReservation::new(
            Room::new(room_id(99), "Ghost"),
            stay("2050-01-01", "2050-01-02"),
        )
        .with_guest(guest());
        let err = repo.create_reservation(&draft, Deadline::none()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "room_id"));
    }

    #[test]
    fn test_draft_without_guest_is_validation() {
        let mut repo = repo();
        let room = repo.get_room(room_id(1)).unwrap().unwrap();
        let draft = DraftReservation::new(room, stay("2050-01-01", "2050-01-02"));
        assert!(repo
            .create_reservation(&draft, Deadline::none())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_reservation_insert_fault_leaves_nothing() {
        let mut repo = repo();
        repo.fail_reservation_insert_for(room_id(2));
        let s = stay("2050-01-01", "2050-01-02");
        let err = repo
            .create_reservation(&draft(&repo, 2, s), Deadline::none())
            .unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(repo.reservation_count(), 0);
        assert_eq!(repo.restriction_count(), 0);
    }

    #[test]
    fn test_restriction_insert_fault_rolls_back_reservation() {
        let mut repo = repo();
        repo.fail_restriction_insert_for(room_id(1));
        let s = stay("2050-01-01", "2050-01-02");
        assert!(repo.create_reservation(&draft(&repo, 1, s), Deadline::none()).is_err());
        assert_eq!(repo.reservation_count(), 0);
        assert_eq!(repo.restriction_count(), 0);
        assert!(repo.is_room_available(room_id(1), &s).unwrap());
    }

    #[test]
    fn test_query_fault_is_storage_error() {
        let repo = repo();
        repo.fail_queries_from(NaiveDate::from_ymd_opt(2060, 1, 1).unwrap());
        let err = repo
            .search_available_rooms(&stay("2060-01-01", "2060-01-02"), Deadline::none())
            .unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert!(repo
            .is_room_available(room_id(1), &stay("2060-01-01", "2060-01-02"))
            .is_err());
        assert!(repo
            .search_available_rooms(&stay("2050-01-01", "2050-01-02"), Deadline::none())
            .is_ok());
    }

    #[test]
    fn test_expired_deadline_writes_nothing() {
        let mut repo = repo();
        let s = stay("2050-01-01", "2050-01-02");
        let err = repo
            .create_reservation(&draft(&repo, 1, s), Deadline::after(Duration::ZERO))
            .unwrap_err();
        assert!(matches!(err, Error::Timeout));
        assert_eq!(repo.reservation_count(), 0);
        assert!(repo.is_room_available(room_id(1), &s).unwrap());
    }

    #[test]
    fn test_search_with_expired_deadline_times_out() {
        let repo = repo();
        let s = stay("2050-01-01", "2050-01-02");
        let err = repo
            .search_available_rooms(&s, Deadline::after(Duration::ZERO))
            .unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[test]
    fn test_clones_share_inventory() {
        let repo = repo();
        let mut clone = repo.clone();
        let s = stay("2050-01-01", "2050-01-02");
        clone.block_room(room_id(1), &s, Deadline::none()).unwrap();
        assert!(!repo.is_room_available(room_id(1), &s).unwrap());
    }
}
