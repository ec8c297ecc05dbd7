//! Dining Table Model

use super::restaurant::default_true;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dining table entity (桌台)
///
/// `min_seats` is the smallest party the table should be offered to, so a
/// couple is not seated at an eight-top while smaller tables are free.
/// `pos_x`/`pos_y` are the floor-plan editor's stored position; nothing in
/// availability reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Owning restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub name: String,
    pub capacity: u32,
    #[serde(default = "default_min_seats")]
    pub min_seats: u32,
    /// Location tag shown to diners (Window, Bar, Terrace, …)
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub pos_x: f32,
    #[serde(default)]
    pub pos_y: f32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_min_seats() -> u32 {
    1
}

impl DiningTable {
    /// The id as the "table:key" string used in reservation records
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub name: String,
    pub capacity: u32,
    pub min_seats: Option<u32>,
    pub location: Option<String>,
    pub pos_x: Option<f32>,
    pub pos_y: Option<f32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
