//! Time-of-day type used for schedules and booking slots
//!
//! A slot is a discrete bookable point in time within a day. All schedule
//! windows and reservation slots are expressed as minutes from midnight and
//! serialized as `"HH:MM"`, the format the frontend and the schedule editor
//! exchange.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minutes in a full day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A clock time with minute precision, stored as minutes from midnight
///
/// Ordering is plain clock order; schedule code is responsible for
/// interpreting windows that cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

/// Error parsing a `"HH:MM"` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day: {0}")]
pub struct ParseTimeError(pub String);

impl TimeOfDay {
    /// Midnight (00:00) — also one half of the closed-day sentinel
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from hour and minute, rejecting out-of-range values
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Build from minutes since midnight
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Add minutes, wrapping around midnight
    pub fn wrapping_add(&self, minutes: u16) -> Self {
        Self((self.0 + minutes) % MINUTES_PER_DAY)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ParseTimeError(s.to_string()))?;
        let hour: u16 = h.parse().map_err(|_| ParseTimeError(s.to_string()))?;
        let minute: u16 = m.parse().map_err(|_| ParseTimeError(s.to_string()))?;
        TimeOfDay::new(hour, minute).ok_or_else(|| ParseTimeError(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
