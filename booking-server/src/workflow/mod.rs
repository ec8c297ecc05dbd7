//! Booking wizard
//!
//! The four-step booking flow as an explicit state machine, decoupled from
//! any rendering: date & party size → time → table → contact details. Each
//! step has a completion gate; moving backward is always allowed, moving
//! forward only once the current step's gate is satisfied. Changing an
//! earlier answer clears the selections that depended on it.
//!
//! The wizard only ever selects from lists the Availability Resolver
//! produced, and its output is a single [`ReservationDraft`] handed to the
//! reservations manager, which re-verifies the slot under its write lock —
//! selection-time checks alone cannot close the booking race.

use crate::db::models::DiningTable;
use crate::utils::validation::{self, MAX_NOTE_LEN};
use chrono::NaiveDate;
use shared::error::{AppError, AppResult};
use shared::models::{ContactInfo, ReservationDraft, SlotAvailability};
use shared::types::TimeOfDay;

/// Wizard steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingStep {
    DateParty,
    Time,
    Table,
    Contact,
}

impl BookingStep {
    fn previous(&self) -> BookingStep {
        match self {
            Self::DateParty | Self::Time => Self::DateParty,
            Self::Table => Self::Time,
            Self::Contact => Self::Table,
        }
    }
}

/// Chosen table, carrying the name snapshot for the reservation record
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableChoice {
    id: String,
    name: String,
}

/// The booking wizard's collected state
#[derive(Debug, Clone)]
pub struct BookingWizard {
    restaurant_id: String,
    max_party_size: u32,
    step: BookingStep,
    date: Option<NaiveDate>,
    party_size: Option<u32>,
    slot: Option<TimeOfDay>,
    table: Option<TableChoice>,
}

impl BookingWizard {
    pub fn new(restaurant_id: impl Into<String>, max_party_size: u32) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            max_party_size,
            step: BookingStep::DateParty,
            date: None,
            party_size: None,
            slot: None,
            table: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn party_size(&self) -> Option<u32> {
        self.party_size
    }

    pub fn slot(&self) -> Option<TimeOfDay> {
        self.slot
    }

    /// Step 1 gate: a selected date and a sane party size
    ///
    /// Changing either invalidates the slot and table picked for the old
    /// answer, and the wizard moves to the time step.
    pub fn select_date_party(&mut self, date: NaiveDate, party_size: u32) -> AppResult<()> {
        if party_size == 0 || party_size > self.max_party_size {
            return Err(AppError::out_of_range(format!(
                "Party size {} is out of range (1..={})",
                party_size, self.max_party_size
            )));
        }
        if self.date != Some(date) || self.party_size != Some(party_size) {
            self.slot = None;
            self.table = None;
        }
        self.date = Some(date);
        self.party_size = Some(party_size);
        self.step = BookingStep::Time;
        Ok(())
    }

    /// Step 2 gate: a slot drawn from the offered availability list
    ///
    /// An empty or fully-booked list blocks advancement — the caller
    /// surfaces "pick another date" instead of letting an invalid
    /// selection through.
    pub fn select_slot(&mut self, slot: TimeOfDay, offered: &[SlotAvailability]) -> AppResult<()> {
        self.require_reached(BookingStep::Time)?;
        if !offered.iter().any(|s| s.available) {
            return Err(AppError::slot_unavailable(
                "No available time slots for this date, please select another date",
            ));
        }
        let valid = offered.iter().any(|s| s.available && s.slot == slot);
        if !valid {
            return Err(AppError::validation(format!(
                "Time {} is not an offered slot",
                slot
            )));
        }
        if self.slot != Some(slot) {
            self.table = None;
        }
        self.slot = Some(slot);
        self.step = BookingStep::Table;
        Ok(())
    }

    /// Step 3 gate: a table drawn from the eligible list
    pub fn select_table(&mut self, table_id: &str, offered: &[DiningTable]) -> AppResult<()> {
        self.require_reached(BookingStep::Table)?;
        if offered.is_empty() {
            return Err(AppError::slot_unavailable(
                "No tables available for your party size, please adjust it or pick another time",
            ));
        }
        let chosen = offered
            .iter()
            .find(|t| t.id_string() == table_id)
            .ok_or_else(|| {
                AppError::validation(format!("Table {} is not among the offered tables", table_id))
            })?;
        self.table = Some(TableChoice {
            id: chosen.id_string(),
            name: chosen.name.clone(),
        });
        self.step = BookingStep::Contact;
        Ok(())
    }

    /// Step 4 gate: contact details; emits the atomic creation request
    pub fn submit_contact(
        &self,
        contact: ContactInfo,
        special_request: Option<String>,
    ) -> AppResult<ReservationDraft> {
        self.require_reached(BookingStep::Contact)?;
        validation::validate_contact(&contact)?;
        validation::validate_optional_text(&special_request, "special_request", MAX_NOTE_LEN)?;

        let out_of_sync = || AppError::internal("Booking wizard state is out of sync");
        let table = self.table.as_ref().ok_or_else(out_of_sync)?;
        Ok(ReservationDraft {
            restaurant_id: self.restaurant_id.clone(),
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            date: self.date.ok_or_else(out_of_sync)?,
            slot: self.slot.ok_or_else(out_of_sync)?,
            party_size: self.party_size.ok_or_else(out_of_sync)?,
            contact,
            special_request: special_request.filter(|s| !s.trim().is_empty()),
        })
    }

    /// Move back one step; completed selections stay so the step can be
    /// revisited without retyping
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    fn require_reached(&self, step: BookingStep) -> AppResult<()> {
        let reached = match step {
            BookingStep::DateParty => true,
            BookingStep::Time => self.date.is_some() && self.party_size.is_some(),
            BookingStep::Table => self.slot.is_some(),
            BookingStep::Contact => self.table.is_some(),
        };
        if reached {
            Ok(())
        } else {
            Err(AppError::invalid_request(
                "Previous booking steps are not complete",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use surrealdb::RecordId;

    fn offered_slots() -> Vec<SlotAvailability> {
        ["18:00", "18:30", "19:00"]
            .iter()
            .enumerate()
            .map(|(i, s)| SlotAvailability {
                slot: s.parse().unwrap(),
                available: i != 1, // 18:30 already taken
            })
            .collect()
    }

    fn offered_tables() -> Vec<DiningTable> {
        vec![DiningTable {
            id: Some(RecordId::from_table_key("dining_table", "t2")),
            restaurant: RecordId::from_table_key("restaurant", "bistro"),
            name: "Table 2".into(),
            capacity: 4,
            min_seats: 2,
            location: "Window".into(),
            pos_x: 0.0,
            pos_y: 0.0,
            is_active: true,
        }]
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            first_name: "Emma".into(),
            last_name: "Johnson".into(),
            email: "emma.j@example.com".into(),
            phone: "+1 (555) 987-6543".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
    }

    #[test]
    fn test_happy_path_emits_draft() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 4).unwrap();
        wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap();
        wizard
            .select_table("dining_table:t2", &offered_tables())
            .unwrap();
        let draft = wizard.submit_contact(contact(), Some("Birthday".into())).unwrap();

        assert_eq!(draft.restaurant_id, "restaurant:bistro");
        assert_eq!(draft.table_id, "dining_table:t2");
        assert_eq!(draft.table_name, "Table 2");
        assert_eq!(draft.party_size, 4);
        assert_eq!(draft.special_request.as_deref(), Some("Birthday"));
    }

    #[test]
    fn test_cannot_skip_ahead() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        let err = wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err = wizard.submit_contact(contact(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_party_size_gate() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        assert!(wizard.select_date_party(date(), 0).is_err());
        assert!(wizard.select_date_party(date(), 21).is_err());
        assert!(wizard.select_date_party(date(), 20).is_ok());
    }

    #[test]
    fn test_unavailable_slot_rejected() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        let err = wizard
            .select_slot("18:30".parse().unwrap(), &offered_slots())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_empty_slot_list_blocks_advancement() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        let err = wizard
            .select_slot("19:00".parse().unwrap(), &[])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
        assert_eq!(wizard.step(), BookingStep::Time);
    }

    #[test]
    fn test_no_eligible_tables_blocks_advancement() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap();
        let err = wizard.select_table("dining_table:t2", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
    }

    #[test]
    fn test_back_navigation_keeps_selections() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap();
        wizard.back();
        assert_eq!(wizard.step(), BookingStep::Time);
        assert_eq!(wizard.slot(), Some("19:00".parse().unwrap()));
        wizard.back();
        wizard.back();
        assert_eq!(wizard.step(), BookingStep::DateParty);
    }

    #[test]
    fn test_changing_date_invalidates_downstream() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap();
        wizard
            .select_table("dining_table:t2", &offered_tables())
            .unwrap();

        let other_date = NaiveDate::from_ymd_opt(2023, 6, 16).unwrap();
        wizard.select_date_party(other_date, 2).unwrap();
        assert_eq!(wizard.slot(), None);
        let err = wizard.submit_contact(contact(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_contact_gate_requires_all_fields() {
        let mut wizard = BookingWizard::new("restaurant:bistro", 20);
        wizard.select_date_party(date(), 2).unwrap();
        wizard
            .select_slot("19:00".parse().unwrap(), &offered_slots())
            .unwrap();
        wizard
            .select_table("dining_table:t2", &offered_tables())
            .unwrap();

        let mut incomplete = contact();
        incomplete.email = "".into();
        assert!(wizard.submit_contact(incomplete, None).is_err());

        let mut bad_email = contact();
        bad_email.email = "not-an-email".into();
        assert!(wizard.submit_contact(bad_email, None).is_err());
    }
}
