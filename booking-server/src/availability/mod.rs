//! Availability Resolver
//!
//! Turns the Schedule Resolver's verdict, the table catalog, and the
//! reservation ledger into bookable slots and seatable tables. Nothing
//! here is cached: every query recomputes from a fresh read snapshot, so
//! there is no invalidation logic and repeated queries with no writes in
//! between return identical results.

pub mod matcher;

use crate::db::models::DiningTable;
use crate::db::repository::DiningTableRepository;
use crate::reservations::ReservationsManager;
use crate::scheduling::ScheduleService;
use chrono::NaiveDate;
use shared::error::{AppError, AppResult};
use shared::models::{HoursSpan, ResolvedHours, SlotAvailability};
use shared::types::TimeOfDay;
use std::collections::HashSet;
use std::sync::Arc;

/// Enumerate fixed-granularity slots within an open window
///
/// A slot must fit entirely before close: a 30-minute grid over
/// 11:00–22:00 ends at 21:30. Windows that cross midnight keep producing
/// slots past 24:00, wrapping the clock face.
pub fn enumerate_slots(span: HoursSpan, slot_minutes: u16) -> Vec<TimeOfDay> {
    if span.is_closed() || slot_minutes == 0 {
        return Vec::new();
    }
    let duration = span.duration_minutes();
    let mut slots = Vec::new();
    let mut offset = 0u16;
    while offset + slot_minutes <= duration {
        slots.push(span.open.wrapping_add(offset));
        offset += slot_minutes;
    }
    slots
}

/// Availability queries over catalog + ledger
pub struct AvailabilityService {
    schedule: Arc<ScheduleService>,
    tables: DiningTableRepository,
    reservations: Arc<ReservationsManager>,
    slot_minutes: u16,
}

impl AvailabilityService {
    pub fn new(
        schedule: Arc<ScheduleService>,
        tables: DiningTableRepository,
        reservations: Arc<ReservationsManager>,
        slot_minutes: u16,
    ) -> Self {
        Self {
            schedule,
            tables,
            reservations,
            slot_minutes,
        }
    }

    pub fn slot_minutes(&self) -> u16 {
        self.slot_minutes
    }

    /// All slots of the day with availability flags
    ///
    /// A closed day yields an empty list — a normal, displayable state,
    /// not an error. A slot is available when at least one table can seat
    /// the party and has no pending/confirmed hold.
    pub async fn list_slots(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        party_size: u32,
    ) -> AppResult<Vec<SlotAvailability>> {
        let resolved = self.schedule.resolved_hours(restaurant_id, date).await?;
        let Some(window) = resolved.window() else {
            return Ok(Vec::new());
        };

        let tables = self.tables.find_by_restaurant(restaurant_id).await?;
        let held = self.held_set(date)?;

        let slots = enumerate_slots(window, self.slot_minutes)
            .into_iter()
            .map(|slot| {
                let available = tables.iter().any(|t| {
                    matcher::is_eligible(t, party_size)
                        && !held.contains(&(t.id_string(), slot.minutes()))
                });
                SlotAvailability { slot, available }
            })
            .collect();
        Ok(slots)
    }

    /// Eligible tables for one slot, in advisory ranking order
    ///
    /// Errors with `RestaurantClosed` when the slot falls outside the
    /// resolved open window — the same check the create path runs.
    pub async fn list_tables(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        slot: TimeOfDay,
        party_size: u32,
    ) -> AppResult<Vec<DiningTable>> {
        self.ensure_open(restaurant_id, date, slot).await?;

        let tables = self.tables.find_by_restaurant(restaurant_id).await?;
        let held = self.held_set(date)?;

        let free: Vec<DiningTable> = tables
            .into_iter()
            .filter(|t| !held.contains(&(t.id_string(), slot.minutes())))
            .collect();
        Ok(matcher::rank_tables(free, party_size))
    }

    /// Check that a slot lies within the restaurant's resolved open window
    pub async fn ensure_open(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        slot: TimeOfDay,
    ) -> AppResult<ResolvedHours> {
        let resolved = self.schedule.resolved_hours(restaurant_id, date).await?;
        let open = resolved
            .window()
            .map(|w| w.contains_slot(slot, self.slot_minutes))
            .unwrap_or(false);
        if !open {
            return Err(AppError::closed(format!(
                "Restaurant is closed at {} {}",
                date, slot
            )));
        }
        Ok(resolved)
    }

    fn held_set(&self, date: NaiveDate) -> AppResult<HashSet<(String, u16)>> {
        Ok(self
            .reservations
            .held_slots_on(date)
            .map_err(AppError::from)?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_enumerate_standard_day() {
        let slots = enumerate_slots(HoursSpan::new(t("11:00"), t("22:00")), 30);
        assert_eq!(slots.len(), 22);
        assert_eq!(slots.first(), Some(&t("11:00")));
        assert_eq!(slots.last(), Some(&t("21:30")));
        assert!(slots.contains(&t("19:00")));
        assert!(!slots.contains(&t("22:00")));
    }

    #[test]
    fn test_enumerate_closed_day_is_empty() {
        assert!(enumerate_slots(HoursSpan::CLOSED, 30).is_empty());
    }

    #[test]
    fn test_enumerate_crosses_midnight() {
        // New Year's Eve 11:00–01:00
        let slots = enumerate_slots(HoursSpan::new(t("11:00"), t("01:00")), 30);
        assert_eq!(slots.first(), Some(&t("11:00")));
        assert_eq!(slots.last(), Some(&t("00:30")));
        assert!(slots.contains(&t("23:30")));
        assert!(slots.contains(&t("00:00")));
    }

    #[test]
    fn test_enumerate_is_deterministic() {
        let span = HoursSpan::new(t("12:00"), t("23:00"));
        assert_eq!(enumerate_slots(span, 30), enumerate_slots(span, 30));
    }

    #[test]
    fn test_zero_granularity_guard() {
        assert!(enumerate_slots(HoursSpan::new(t("11:00"), t("22:00")), 0).is_empty());
    }
}
