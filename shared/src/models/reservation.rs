//! Reservation model and status lifecycle (预订)

use crate::types::TimeOfDay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation lifecycle status
///
/// `Pending` is the entry state (or `Confirmed` when the restaurant runs
/// without a manual approval step). `Cancelled` and `Completed` are
/// terminal. The transition table lives in [`can_transition_to`] and is
/// enforced centrally by the reservations manager, never re-implemented
/// at call sites.
///
/// [`can_transition_to`]: ReservationStatus::can_transition_to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// No further transition is legal out of a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether a reservation in this status occupies its (table, date,
    /// slot) tuple — cancelled and completed reservations free the table
    pub fn holds_table(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// The lifecycle transition table
    ///
    /// | From      | To        | Trigger                    |
    /// |-----------|-----------|----------------------------|
    /// | pending   | confirmed | staff approval             |
    /// | pending   | cancelled | staff or customer          |
    /// | confirmed | cancelled | staff or customer          |
    /// | confirmed | completed | staff marks visit done     |
    pub fn can_transition_to(&self, to: ReservationStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer contact details collected by the booking wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A confirmed booking of one table for one slot on one date
///
/// Reservations are never deleted; they only move through the status
/// lifecycle, preserving history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: String,
    pub table_id: String,
    /// Table name snapshot at booking time
    pub table_name: String,
    pub date: NaiveDate,
    pub slot: TimeOfDay,
    pub party_size: u32,
    pub contact: ContactInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
    pub status: ReservationStatus,
    /// Customer-facing code, e.g. `RSV20230615-10001`
    pub confirmation_code: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The single atomic "create reservation" request the booking wizard
/// emits on completion of its last step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub restaurant_id: String,
    pub table_id: String,
    pub table_name: String,
    pub date: NaiveDate,
    pub slot: TimeOfDay,
    pub party_size: u32,
    pub contact: ContactInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_transition_table_exhaustive() {
        let legal = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
            (Confirmed, Completed),
        ];
        for from in ReservationStatus::ALL {
            for to in ReservationStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_frozen() {
        for to in ReservationStatus::ALL {
            assert!(!Cancelled.can_transition_to(to));
            assert!(!Completed.can_transition_to(to));
        }
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn test_holds_table() {
        assert!(Pending.holds_table());
        assert!(Confirmed.holds_table());
        assert!(!Cancelled.holds_table());
        assert!(!Completed.holds_table());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Confirmed).unwrap(), "\"confirmed\"");
        let s: ReservationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(s, Pending);
    }

    #[test]
    fn test_reservation_serde_round_trip() {
        let res = Reservation {
            id: "res-001".into(),
            restaurant_id: "restaurant:petit_bistro".into(),
            table_id: "dining_table:t3".into(),
            table_name: "Table 3".into(),
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            slot: "19:00".parse().unwrap(),
            party_size: 4,
            contact: ContactInfo {
                first_name: "John".into(),
                last_name: "Smith".into(),
                email: "john.smith@example.com".into(),
                phone: "+1 (555) 123-4567".into(),
            },
            special_request: Some("Window seat if possible".into()),
            status: Confirmed,
            confirmation_code: "RSV20230615-10001".into(),
            created_at: 1686407025000,
            updated_at: 1686407025000,
        };
        let json = serde_json::to_string(&res).unwrap();
        let back: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, res);
        assert_eq!(back.contact.full_name(), "John Smith");
    }
}
