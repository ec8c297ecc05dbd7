//! No-double-booking under concurrency
//!
//! Two bookers who both observed the table as free race their creates;
//! the redb single-writer serializes them and exactly one wins.

use booking_server::reservations::{BookingPolicy, ManagerError, ReservationStore, ReservationsManager};
use chrono::NaiveDate;
use shared::models::{ContactInfo, ReservationDraft};
use std::sync::{Arc, Barrier};

fn draft(first_name: &str) -> ReservationDraft {
    ReservationDraft {
        restaurant_id: "restaurant:bistro".into(),
        table_id: "dining_table:t2".into(),
        table_name: "T2".into(),
        date: NaiveDate::from_ymd_opt(2023, 6, 19).unwrap(),
        slot: "19:00".parse().unwrap(),
        party_size: 4,
        contact: ContactInfo {
            first_name: first_name.into(),
            last_name: "Racer".into(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            phone: "+34 600 000 000".into(),
        },
        special_request: None,
    }
}

#[test]
fn concurrent_creates_one_success_one_conflict() {
    let manager = Arc::new(ReservationsManager::new(
        ReservationStore::open_in_memory().unwrap(),
        BookingPolicy::default(),
    ));

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for name in ["Alice", "Bob"] {
        let manager = manager.clone();
        let barrier = barrier.clone();
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            manager.create(draft(name))
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ManagerError::SlotTaken { .. })))
        .count();

    assert_eq!(successes, 1, "exactly one booker wins the tuple");
    assert_eq!(conflicts, 1, "the loser gets a conflict, not a crash");

    // the winner's hold is the only one on the ledger
    let held = manager
        .held_slots_on(NaiveDate::from_ymd_opt(2023, 6, 19).unwrap())
        .unwrap();
    assert_eq!(held.len(), 1);
}

#[test]
fn many_racers_still_one_winner() {
    let manager = Arc::new(ReservationsManager::new(
        ReservationStore::open_in_memory().unwrap(),
        BookingPolicy::default(),
    ));

    let n = 8;
    let barrier = Arc::new(Barrier::new(n));
    let handles: Vec<_> = (0..n)
        .map(|i| {
            let manager = manager.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                manager.create(draft(&format!("Racer{i}")))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .all(|r| r.is_ok() || matches!(r, Err(ManagerError::SlotTaken { .. })))
    );
}
