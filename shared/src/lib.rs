//! Shared types for the Mesa booking platform
//!
//! Common types used across crates: domain models, the unified
//! error system, response structures, and time-of-day utilities.

pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use types::TimeOfDay;
