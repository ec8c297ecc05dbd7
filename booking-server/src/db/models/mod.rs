//! Catalog row models (SurrealDB)

pub mod dining_table;
pub mod restaurant;
pub mod schedule;
pub mod serde_helpers;

// Re-exports
pub use dining_table::*;
pub use restaurant::*;
pub use schedule::*;
