//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RestaurantNotFound
            | Self::ReservationNotFound
            | Self::TableNotFound
            | Self::OverrideNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict — caller should re-query and retry once
            Self::AlreadyExists
            | Self::RestaurantNameExists
            | Self::TableNameExists
            | Self::SlotConflict
            | Self::StatusConflict => StatusCode::CONFLICT,

            // 422 Unprocessable — request is well-formed but the business
            // state rejects it; recoverable by choosing differently
            Self::RestaurantClosed
            | Self::RestaurantInactive
            | Self::SlotUnavailable
            | Self::InvalidTransition
            | Self::VisitNotStarted
            | Self::TableTooSmall
            | Self::TableInactive => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient, client can retry)
            Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageFull
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
