//! Operating schedule models (营业时间)
//!
//! A restaurant has one weekly recurring schedule (seven entries, Monday
//! first) plus date-specific overrides for holidays and special days. An
//! entry where open equals close (canonically `00:00`–`00:00`, the format
//! the schedule editor writes) marks the day as closed; both regular and
//! override entries reuse that sentinel, so it must round-trip exactly.

use crate::types::{MINUTES_PER_DAY, TimeOfDay};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// An open/close pair for one day
///
/// `close <= open` (other than the closed sentinel) means the window runs
/// past midnight, e.g. New Year's Eve `11:00`–`01:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSpan {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl HoursSpan {
    /// The closed-day sentinel: 00:00–00:00
    pub const CLOSED: HoursSpan = HoursSpan {
        open: TimeOfDay::MIDNIGHT,
        close: TimeOfDay::MIDNIGHT,
    };

    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    /// Open equals close means closed, never a 24-hour window
    pub fn is_closed(&self) -> bool {
        self.open == self.close
    }

    /// Length of the open window in minutes (0 when closed)
    pub fn duration_minutes(&self) -> u16 {
        if self.is_closed() {
            0
        } else if self.close > self.open {
            self.close.minutes() - self.open.minutes()
        } else {
            // window crosses midnight
            self.close.minutes() + MINUTES_PER_DAY - self.open.minutes()
        }
    }

    /// Whether a slot of `slot_minutes` length starting at `slot` fits
    /// entirely inside the window
    pub fn contains_slot(&self, slot: TimeOfDay, slot_minutes: u16) -> bool {
        if self.is_closed() {
            return false;
        }
        let offset =
            (slot.minutes() + MINUTES_PER_DAY - self.open.minutes()) % MINUTES_PER_DAY;
        offset + slot_minutes <= self.duration_minutes()
    }
}

impl Default for HoursSpan {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// The weekly recurring schedule: one entry per weekday, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeeklyHours {
    pub days: [HoursSpan; 7],
}

impl WeeklyHours {
    pub fn get(&self, weekday: Weekday) -> HoursSpan {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, weekday: Weekday, hours: HoursSpan) {
        self.days[weekday.num_days_from_monday() as usize] = hours;
    }
}

/// The Schedule Resolver verdict for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResolvedHours {
    Open { open: TimeOfDay, close: TimeOfDay },
    Closed,
}

impl ResolvedHours {
    /// Collapse the closed sentinel into the `Closed` variant
    pub fn from_span(span: HoursSpan) -> Self {
        if span.is_closed() {
            Self::Closed
        } else {
            Self::Open {
                open: span.open,
                close: span.close,
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn window(&self) -> Option<HoursSpan> {
        match self {
            Self::Open { open, close } => Some(HoursSpan::new(*open, *close)),
            Self::Closed => None,
        }
    }
}

/// One bookable slot with its availability flag, derived at query time
/// and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: TimeOfDay,
    pub available: bool,
}
