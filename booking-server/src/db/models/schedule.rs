//! Operating schedule row models
//!
//! The weekly schedule is stored as up to seven rows per restaurant, one
//! per weekday. Overrides are stored as one row per (restaurant, date).

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::HoursSpan;
use surrealdb::RecordId;

/// One weekday's recurring hours (weekday 0 = Monday … 6 = Sunday)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyHoursRow {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub weekday: u8,
    pub hours: HoursSpan,
}

/// A date-specific replacement for the weekly schedule (特殊营业日)
///
/// Takes precedence over the weekly entry for its date. The closed
/// sentinel (00:00–00:00) marks a full-day closure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOverride {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub date: NaiveDate,
    pub hours: HoursSpan,
}

/// Set/replace override payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOverrideSet {
    pub date: NaiveDate,
    pub hours: HoursSpan,
}
