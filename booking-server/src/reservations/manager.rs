//! ReservationsManager - atomic booking writes and lifecycle transitions
//!
//! # Create Flow
//!
//! ```text
//! create(draft)
//!     ├─ 1. Sanity-check the party size
//!     ├─ 2. Begin write transaction (redb single writer)
//!     ├─ 3. Re-check the (table, date, slot) hold      ← closes the race
//!     ├─ 4. Allocate the confirmation code
//!     ├─ 5. Insert reservation + hold
//!     ├─ 6. Commit
//!     └─ 7. Broadcast event
//! ```
//!
//! Two bookers who both saw the table as free serialize at step 2; the
//! second finds the hold at step 3 and gets `SlotTaken`. Transitions are
//! compare-and-set: the caller sends the status it saw, and a mismatch is
//! a conflict rather than a silent overwrite.

use super::error::{ManagerError, ManagerResult};
use super::storage::ReservationStore;
use chrono::NaiveDate;
use shared::models::{Reservation, ReservationDraft, ReservationStatus};
use shared::util::{now_millis, prefixed_id};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Booking policy knobs that are configuration, not domain rules
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    /// Skip the manual approval step: new reservations enter `confirmed`
    pub auto_confirm: bool,
    /// Sanity cap on party size (not a domain limit)
    pub max_party_size: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            auto_confirm: false,
            max_party_size: 20,
        }
    }
}

/// Reservation change notifications for dashboards and sync listeners
#[derive(Debug, Clone)]
pub enum ReservationEvent {
    Created(Reservation),
    StatusChanged {
        id: String,
        from: ReservationStatus,
        to: ReservationStatus,
    },
}

/// Manager for reservation creation and lifecycle
pub struct ReservationsManager {
    store: ReservationStore,
    policy: BookingPolicy,
    event_tx: broadcast::Sender<ReservationEvent>,
}

impl std::fmt::Debug for ReservationsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationsManager")
            .field("policy", &self.policy)
            .finish()
    }
}

impl ReservationsManager {
    pub fn new(store: ReservationStore, policy: BookingPolicy) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            policy,
            event_tx,
        }
    }

    pub fn policy(&self) -> BookingPolicy {
        self.policy
    }

    /// Subscribe to reservation events
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.event_tx.subscribe()
    }

    /// Create a reservation, claiming its (table, date, slot) tuple
    ///
    /// The hold check and the insert run in one write transaction, so of
    /// two concurrent bookers exactly one succeeds.
    pub fn create(&self, draft: ReservationDraft) -> ManagerResult<Reservation> {
        if draft.party_size == 0 || draft.party_size > self.policy.max_party_size {
            return Err(ManagerError::PartyOutOfRange {
                size: draft.party_size,
                max: self.policy.max_party_size,
            });
        }

        let txn = self.store.begin_write()?;

        // Re-verify availability at creation time, not only at selection time
        if let Some(holder) =
            self.store
                .hold_owner_txn(&txn, &draft.table_id, draft.date, draft.slot.minutes())?
        {
            tracing::debug!(
                table_id = %draft.table_id,
                date = %draft.date,
                slot = %draft.slot,
                holder = %holder,
                "Slot already held"
            );
            return Err(ManagerError::SlotTaken {
                table_id: draft.table_id,
                date: draft.date,
                slot: draft.slot,
            });
        }

        let confirmation_code = self.next_confirmation_code(&txn, draft.date)?;
        let status = if self.policy.auto_confirm {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };
        let now = now_millis();

        let reservation = Reservation {
            id: prefixed_id("res"),
            restaurant_id: draft.restaurant_id,
            table_id: draft.table_id,
            table_name: draft.table_name,
            date: draft.date,
            slot: draft.slot,
            party_size: draft.party_size,
            contact: draft.contact,
            special_request: draft.special_request,
            status,
            confirmation_code,
            created_at: now,
            updated_at: now,
        };

        self.store.store_reservation(&txn, &reservation)?;
        self.store.set_hold(
            &txn,
            &reservation.table_id,
            reservation.date,
            reservation.slot.minutes(),
            &reservation.id,
        )?;
        txn.commit().map_err(super::storage::StorageError::from)?;

        tracing::info!(
            reservation_id = %reservation.id,
            confirmation_code = %reservation.confirmation_code,
            table_id = %reservation.table_id,
            date = %reservation.date,
            slot = %reservation.slot,
            party_size = reservation.party_size,
            status = %reservation.status,
            "Reservation created"
        );
        let _ = self.event_tx.send(ReservationEvent::Created(reservation.clone()));

        Ok(reservation)
    }

    /// Compare-and-set status transition
    ///
    /// Rejects with `StatusConflict` when the reservation moved since the
    /// caller read it, and with `InvalidTransition` when the lifecycle
    /// table forbids the move. Entering a terminal status releases the
    /// (table, date, slot) tuple in the same transaction.
    pub fn transition(
        &self,
        id: &str,
        expected: ReservationStatus,
        new_status: ReservationStatus,
    ) -> ManagerResult<Reservation> {
        let txn = self.store.begin_write()?;

        let mut reservation = self
            .store
            .get_reservation_txn(&txn, id)?
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;

        if reservation.status != expected {
            return Err(ManagerError::StatusConflict {
                expected,
                actual: reservation.status,
            });
        }
        if !expected.can_transition_to(new_status) {
            return Err(ManagerError::InvalidTransition {
                from: expected,
                to: new_status,
            });
        }

        reservation.status = new_status;
        reservation.updated_at = now_millis();
        self.store.store_reservation(&txn, &reservation)?;

        if expected.holds_table() && !new_status.holds_table() {
            self.store.clear_hold(
                &txn,
                &reservation.table_id,
                reservation.date,
                reservation.slot.minutes(),
            )?;
        }
        txn.commit().map_err(super::storage::StorageError::from)?;

        tracing::info!(
            reservation_id = %id,
            from = %expected,
            to = %new_status,
            "Reservation status changed"
        );
        let _ = self.event_tx.send(ReservationEvent::StatusChanged {
            id: id.to_string(),
            from: expected,
            to: new_status,
        });

        Ok(reservation)
    }

    /// Load one reservation
    pub fn get(&self, id: &str) -> ManagerResult<Reservation> {
        self.store
            .get_reservation(id)?
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))
    }

    /// Reservations of a restaurant, optionally filtered by date and
    /// status, ordered by (date, slot)
    pub fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        date: Option<NaiveDate>,
        status: Option<ReservationStatus>,
    ) -> ManagerResult<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .store
            .list_reservations()?
            .into_iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .filter(|r| date.is_none_or(|d| r.date == d))
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect();
        reservations.sort_by(|a, b| (a.date, a.slot).cmp(&(b.date, b.slot)));
        Ok(reservations)
    }

    /// The (table_id, slot) tuples held on a date, for availability queries
    pub fn held_slots_on(&self, date: NaiveDate) -> ManagerResult<Vec<(String, u16)>> {
        Ok(self.store.held_slots_on(date)?)
    }

    fn next_confirmation_code(
        &self,
        txn: &redb::WriteTransaction,
        date: NaiveDate,
    ) -> ManagerResult<String> {
        let count = self.store.next_confirmation_number(txn, date)?;
        Ok(format!("RSV{}-{}", date.format("%Y%m%d"), 10_000 + count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ContactInfo;

    fn manager() -> ReservationsManager {
        ReservationsManager::new(
            ReservationStore::open_in_memory().unwrap(),
            BookingPolicy::default(),
        )
    }

    fn draft(table_id: &str, slot: &str) -> ReservationDraft {
        ReservationDraft {
            restaurant_id: "restaurant:bistro".into(),
            table_id: table_id.into(),
            table_name: "Table".into(),
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            slot: slot.parse().unwrap(),
            party_size: 2,
            contact: ContactInfo {
                first_name: "John".into(),
                last_name: "Smith".into(),
                email: "john.smith@example.com".into(),
                phone: "+1 (555) 123-4567".into(),
            },
            special_request: None,
        }
    }

    #[test]
    fn test_create_claims_slot() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        assert_eq!(res.status, ReservationStatus::Pending);
        assert!(res.confirmation_code.starts_with("RSV20230615-"));

        let held = mgr.held_slots_on(res.date).unwrap();
        assert_eq!(held, vec![("dining_table:t1".to_string(), 1140)]);
    }

    #[test]
    fn test_create_conflict_on_same_tuple() {
        let mgr = manager();
        mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        let err = mgr.create(draft("dining_table:t1", "19:00")).unwrap_err();
        assert!(matches!(err, ManagerError::SlotTaken { .. }));

        // other slots and tables are unaffected
        mgr.create(draft("dining_table:t1", "19:30")).unwrap();
        mgr.create(draft("dining_table:t2", "19:00")).unwrap();
    }

    #[test]
    fn test_auto_confirm_policy() {
        let mgr = ReservationsManager::new(
            ReservationStore::open_in_memory().unwrap(),
            BookingPolicy {
                auto_confirm: true,
                max_party_size: 20,
            },
        );
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        assert_eq!(res.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn test_party_size_cap() {
        let mgr = manager();
        let mut d = draft("dining_table:t1", "19:00");
        d.party_size = 0;
        assert!(matches!(
            mgr.create(d).unwrap_err(),
            ManagerError::PartyOutOfRange { .. }
        ));

        let mut d = draft("dining_table:t1", "19:00");
        d.party_size = 21;
        assert!(matches!(
            mgr.create(d).unwrap_err(),
            ManagerError::PartyOutOfRange { .. }
        ));
    }

    #[test]
    fn test_transition_happy_path() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();

        let confirmed = mgr
            .transition(&res.id, ReservationStatus::Pending, ReservationStatus::Confirmed)
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);

        let completed = mgr
            .transition(
                &res.id,
                ReservationStatus::Confirmed,
                ReservationStatus::Completed,
            )
            .unwrap();
        assert_eq!(completed.status, ReservationStatus::Completed);
    }

    #[test]
    fn test_transition_cas_mismatch() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();

        // created pending; a caller who assumed confirmed gets a conflict
        let err = mgr
            .transition(
                &res.id,
                ReservationStatus::Confirmed,
                ReservationStatus::Completed,
            )
            .unwrap_err();
        assert!(matches!(err, ManagerError::StatusConflict { .. }));
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();

        // pending cannot skip straight to completed
        let err = mgr
            .transition(&res.id, ReservationStatus::Pending, ReservationStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidTransition { .. }));

        // terminal states are frozen
        mgr.transition(&res.id, ReservationStatus::Pending, ReservationStatus::Cancelled)
            .unwrap();
        let err = mgr
            .transition(
                &res.id,
                ReservationStatus::Cancelled,
                ReservationStatus::Pending,
            )
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidTransition { .. }));
    }

    #[test]
    fn test_confirmed_cannot_revert_to_pending() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        mgr.transition(&res.id, ReservationStatus::Pending, ReservationStatus::Confirmed)
            .unwrap();

        let err = mgr
            .transition(
                &res.id,
                ReservationStatus::Confirmed,
                ReservationStatus::Pending,
            )
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidTransition { .. }));
    }

    #[test]
    fn test_cancel_frees_slot_for_rebooking() {
        let mgr = manager();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        mgr.transition(&res.id, ReservationStatus::Pending, ReservationStatus::Cancelled)
            .unwrap();

        assert!(mgr.held_slots_on(res.date).unwrap().is_empty());
        // same tuple can be booked again; history is preserved
        mgr.create(draft("dining_table:t1", "19:00")).unwrap();
        assert_eq!(mgr.get(&res.id).unwrap().status, ReservationStatus::Cancelled);
    }

    #[test]
    fn test_list_filters_and_order() {
        let mgr = manager();
        let r1 = mgr.create(draft("dining_table:t1", "20:00")).unwrap();
        let _r2 = mgr.create(draft("dining_table:t2", "18:00")).unwrap();
        mgr.transition(&r1.id, ReservationStatus::Pending, ReservationStatus::Confirmed)
            .unwrap();

        let all = mgr
            .list_for_restaurant("restaurant:bistro", None, None)
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].slot, "18:00".parse().unwrap());

        let confirmed = mgr
            .list_for_restaurant(
                "restaurant:bistro",
                None,
                Some(ReservationStatus::Confirmed),
            )
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, r1.id);

        let other = mgr
            .list_for_restaurant("restaurant:other", None, None)
            .unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_events_broadcast() {
        let mgr = manager();
        let mut rx = mgr.subscribe();
        let res = mgr.create(draft("dining_table:t1", "19:00")).unwrap();

        match rx.try_recv().unwrap() {
            ReservationEvent::Created(created) => assert_eq!(created.id, res.id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
