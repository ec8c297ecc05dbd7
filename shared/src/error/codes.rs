//! Unified error codes for the Mesa booking platform
//!
//! This module defines all error codes used across the booking server and
//! its clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Restaurant errors
//! - 3xxx: Schedule errors
//! - 4xxx: Reservation errors
//! - 5xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 2001,
    /// Restaurant is deactivated
    RestaurantInactive = 2002,
    /// Restaurant name already exists
    RestaurantNameExists = 2003,

    // ==================== 3xxx: Schedule ====================
    /// Restaurant is closed at the requested date/time
    RestaurantClosed = 3001,
    /// Open/close pair does not form a usable window
    InvalidHoursWindow = 3002,
    /// No schedule override exists for the date
    OverrideNotFound = 3003,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// No table can seat the party at the requested slot
    SlotUnavailable = 4002,
    /// Table/date/slot was claimed by a concurrent booking
    SlotConflict = 4003,
    /// Reservation status changed since it was read
    StatusConflict = 4004,
    /// Requested lifecycle transition is not legal
    InvalidTransition = 4005,
    /// Reservation cannot be completed before its booked time
    VisitNotStarted = 4006,

    // ==================== 5xxx: Table ====================
    /// Table not found
    TableNotFound = 5001,
    /// Table capacity is below the party size
    TableTooSmall = 5002,
    /// Table is deactivated
    TableInactive = 5003,
    /// Table name already exists in this restaurant
    TableNameExists = 5004,
    /// min_seats exceeds capacity
    InvalidSeatRange = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is deactivated",
            ErrorCode::RestaurantNameExists => "Restaurant name already exists",

            // Schedule
            ErrorCode::RestaurantClosed => "Restaurant is closed at the requested time",
            ErrorCode::InvalidHoursWindow => "Open/close pair does not form a usable window",
            ErrorCode::OverrideNotFound => "No schedule override exists for the date",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::SlotUnavailable => "No table is available for the requested slot",
            ErrorCode::SlotConflict => "Table was booked by someone else, please pick again",
            ErrorCode::StatusConflict => "Reservation status changed since it was read",
            ErrorCode::InvalidTransition => "Requested status transition is not legal",
            ErrorCode::VisitNotStarted => "Reservation cannot be completed before its booked time",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableTooSmall => "Table capacity is below the party size",
            ErrorCode::TableInactive => "Table is deactivated",
            ErrorCode::TableNameExists => "Table name already exists in this restaurant",
            ErrorCode::InvalidSeatRange => "Minimum seats exceeds table capacity",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy, retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}
impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Restaurant
            2001 => Ok(ErrorCode::RestaurantNotFound),
            2002 => Ok(ErrorCode::RestaurantInactive),
            2003 => Ok(ErrorCode::RestaurantNameExists),

            // Schedule
            3001 => Ok(ErrorCode::RestaurantClosed),
            3002 => Ok(ErrorCode::InvalidHoursWindow),
            3003 => Ok(ErrorCode::OverrideNotFound),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::SlotUnavailable),
            4003 => Ok(ErrorCode::SlotConflict),
            4004 => Ok(ErrorCode::StatusConflict),
            4005 => Ok(ErrorCode::InvalidTransition),
            4006 => Ok(ErrorCode::VisitNotStarted),

            // Table
            5001 => Ok(ErrorCode::TableNotFound),
            5002 => Ok(ErrorCode::TableTooSmall),
            5003 => Ok(ErrorCode::TableInactive),
            5004 => Ok(ErrorCode::TableNameExists),
            5005 => Ok(ErrorCode::InvalidSeatRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::RestaurantNotFound.code(), 2001);
        assert_eq!(ErrorCode::RestaurantClosed.code(), 3001);
        assert_eq!(ErrorCode::SlotConflict.code(), 4003);
        assert_eq!(ErrorCode::TableNotFound.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_rejects_unknown() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RestaurantClosed,
            ErrorCode::SlotConflict,
            ErrorCode::StatusConflict,
            ErrorCode::InvalidTransition,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::SlotConflict).unwrap();
        assert_eq!(json, "4003");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "E0000");
        assert_eq!(format!("{}", ErrorCode::SlotUnavailable), "E4002");
    }
}
