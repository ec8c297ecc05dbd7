//! redb-based storage for the reservation ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `reservations` | `reservation_id` | `Reservation` | Full records (append-mostly, status-mutable) |
//! | `slot_holds` | `(table_id, date, slot)` | `reservation_id` | Active hold index — the unit of mutual exclusion |
//! | `counters` | `&str` | `u64` | Per-date confirmation-code counters |
//!
//! `slot_holds` contains exactly the tuples occupied by a `pending` or
//! `confirmed` reservation; terminal transitions remove the hold inside the
//! same write transaction, so the index can never disagree with the record.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), which matters for edge boxes that lose power.
//! The single-writer model is also what serializes concurrent bookings.

use chrono::NaiveDate;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::Reservation;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Full reservation records: key = reservation_id, value = JSON
const RESERVATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("reservations");

/// Active holds: key = (table_id, date "YYYY-MM-DD", slot minutes), value = reservation_id
const SLOT_HOLDS_TABLE: TableDefinition<(&str, &str, u16), &str> =
    TableDefinition::new("slot_holds");

/// Counters: per-visit-date confirmation-code sequence
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key for the redb date component
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reservation ledger backed by redb
#[derive(Clone)]
pub struct ReservationStore {
    db: Arc<Database>,
}

impl ReservationStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and ephemeral setups)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables so first readers don't race table creation
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(SLOT_HOLDS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Reservation records ==========

    /// Store (insert or replace) a reservation within a transaction
    pub fn store_reservation(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(RESERVATIONS_TABLE)?;
        let value = serde_json::to_vec(reservation)?;
        table.insert(reservation.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Load a reservation from a read snapshot
    pub fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Load a reservation within a write transaction
    pub fn get_reservation_txn(
        &self,
        txn: &WriteTransaction,
        id: &str,
    ) -> StorageResult<Option<Reservation>> {
        let table = txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All reservations (read snapshot); callers filter and sort
    pub fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        let mut reservations = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            reservations.push(serde_json::from_slice(value.value())?);
        }
        Ok(reservations)
    }

    // ========== Slot holds ==========

    /// Who currently holds (table, date, slot), checked inside the write
    /// transaction that wants to claim it
    pub fn hold_owner_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        date: NaiveDate,
        slot: u16,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(SLOT_HOLDS_TABLE)?;
        let day = date_key(date);
        let key = (table_id, day.as_str(), slot);
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    /// Claim (table, date, slot) for a reservation
    pub fn set_hold(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        date: NaiveDate,
        slot: u16,
        reservation_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SLOT_HOLDS_TABLE)?;
        let day = date_key(date);
        let key = (table_id, day.as_str(), slot);
        table.insert(key, reservation_id)?;
        Ok(())
    }

    /// Release (table, date, slot) — cancelled/completed reservations free
    /// the tuple for future availability queries
    pub fn clear_hold(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        date: NaiveDate,
        slot: u16,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SLOT_HOLDS_TABLE)?;
        let day = date_key(date);
        let key = (table_id, day.as_str(), slot);
        table.remove(key)?;
        Ok(())
    }

    /// All (table_id, slot) tuples held on a date (read snapshot)
    pub fn held_slots_on(&self, date: NaiveDate) -> StorageResult<Vec<(String, u16)>> {
        let wanted = date_key(date);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOT_HOLDS_TABLE)?;
        let mut held = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let (table_id, day, slot) = key.value();
            if day == wanted {
                held.push((table_id.to_string(), slot));
            }
        }
        Ok(held)
    }

    // ========== Confirmation counter ==========

    /// Next confirmation number for a visit date (crash-safe: committed
    /// with the reservation). Each date has its own counter so codes never
    /// repeat no matter how bookings interleave across dates.
    pub fn next_confirmation_number(
        &self,
        txn: &WriteTransaction,
        date: NaiveDate,
    ) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let key = format!("confirmation_seq:{}", date_key(date));
        let next = table.get(key.as_str())?.map(|g| g.value()).unwrap_or(0) + 1;
        table.insert(key.as_str(), next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ContactInfo, ReservationStatus};

    fn sample_reservation(id: &str) -> Reservation {
        Reservation {
            id: id.to_string(),
            restaurant_id: "restaurant:bistro".into(),
            table_id: "dining_table:t1".into(),
            table_name: "Table 1".into(),
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            slot: "19:00".parse().unwrap(),
            party_size: 2,
            contact: ContactInfo {
                first_name: "Emma".into(),
                last_name: "Johnson".into(),
                email: "emma.j@example.com".into(),
                phone: "+1 (555) 987-6543".into(),
            },
            special_request: None,
            status: ReservationStatus::Pending,
            confirmation_code: "RSV20230615-10001".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_store_and_load() {
        let store = ReservationStore::open_in_memory().unwrap();
        let res = sample_reservation("res-1");

        let txn = store.begin_write().unwrap();
        store.store_reservation(&txn, &res).unwrap();
        txn.commit().unwrap();

        let loaded = store.get_reservation("res-1").unwrap().unwrap();
        assert_eq!(loaded, res);
        assert!(store.get_reservation("res-2").unwrap().is_none());
    }

    #[test]
    fn test_hold_lifecycle() {
        let store = ReservationStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();

        let txn = store.begin_write().unwrap();
        assert!(
            store
                .hold_owner_txn(&txn, "dining_table:t1", date, 1140)
                .unwrap()
                .is_none()
        );
        store
            .set_hold(&txn, "dining_table:t1", date, 1140, "res-1")
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        assert_eq!(
            store
                .hold_owner_txn(&txn, "dining_table:t1", date, 1140)
                .unwrap()
                .as_deref(),
            Some("res-1")
        );
        store
            .clear_hold(&txn, "dining_table:t1", date, 1140)
            .unwrap();
        txn.commit().unwrap();

        assert!(store.held_slots_on(date).unwrap().is_empty());
    }

    #[test]
    fn test_held_slots_filters_by_date() {
        let store = ReservationStore::open_in_memory().unwrap();
        let d1 = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2023, 6, 16).unwrap();

        let txn = store.begin_write().unwrap();
        store.set_hold(&txn, "dining_table:t1", d1, 1140, "res-1").unwrap();
        store.set_hold(&txn, "dining_table:t2", d2, 1140, "res-2").unwrap();
        txn.commit().unwrap();

        let held = store.held_slots_on(d1).unwrap();
        assert_eq!(held, vec![("dining_table:t1".to_string(), 1140)]);
    }

    #[test]
    fn test_confirmation_counter_is_per_date() {
        let store = ReservationStore::open_in_memory().unwrap();
        let d1 = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2023, 6, 16).unwrap();

        let txn = store.begin_write().unwrap();
        assert_eq!(store.next_confirmation_number(&txn, d1).unwrap(), 1);
        assert_eq!(store.next_confirmation_number(&txn, d1).unwrap(), 2);
        assert_eq!(store.next_confirmation_number(&txn, d2).unwrap(), 1);
        // returning to the first date keeps counting, never restarts
        assert_eq!(store.next_confirmation_number(&txn, d1).unwrap(), 3);
        txn.commit().unwrap();
    }

    #[test]
    fn test_reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reservations.redb");

        {
            let store = ReservationStore::open(&path).unwrap();
            let res = sample_reservation("res-1");
            let txn = store.begin_write().unwrap();
            store.store_reservation(&txn, &res).unwrap();
            store
                .set_hold(&txn, &res.table_id, res.date, res.slot.minutes(), &res.id)
                .unwrap();
            txn.commit().unwrap();
        }

        let store = ReservationStore::open(&path).unwrap();
        let loaded = store.get_reservation("res-1").unwrap().unwrap();
        assert_eq!(loaded.id, "res-1");
        assert_eq!(store.held_slots_on(loaded.date).unwrap().len(), 1);
    }
}
