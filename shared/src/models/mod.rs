//! Data models
//!
//! Shared between the booking server and its clients (via API).
//! Catalog row types (restaurants, tables, schedule rows) live in the
//! server's db layer; what lives here is transport-neutral.

pub mod reservation;
pub mod schedule;

// Re-exports
pub use reservation::*;
pub use schedule::*;
