//! Table Matcher
//!
//! Capacity eligibility plus the advisory ranking used for the default
//! display order: smallest sufficient capacity first, and within equal
//! capacity tables whose preferred seat range fits the party come first,
//! so a couple is not steered to an eight-top while a two-top is free.
//! The ranking never removes an eligible table.

use crate::db::models::DiningTable;

/// A table can physically seat the party
pub fn is_eligible(table: &DiningTable, party_size: u32) -> bool {
    table.is_active && table.capacity >= party_size
}

/// Whether the party falls in the table's preferred band
/// `[min_seats, min_seats + 2]`
fn in_preferred_band(table: &DiningTable, party_size: u32) -> bool {
    party_size >= table.min_seats && party_size <= table.min_seats + 2
}

/// Filter to eligible tables and sort by the tie-break policy
pub fn rank_tables(mut tables: Vec<DiningTable>, party_size: u32) -> Vec<DiningTable> {
    tables.retain(|t| is_eligible(t, party_size));
    tables.sort_by(|a, b| {
        let key_a = (a.capacity, !in_preferred_band(a, party_size), &a.name);
        let key_b = (b.capacity, !in_preferred_band(b, party_size), &b.name);
        key_a.cmp(&key_b)
    });
    tables
}
