//! Manager error types and their mapping onto API error codes

use super::storage::StorageError;
use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;
use shared::types::TimeOfDay;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Table {table_id} is already booked for {date} {slot}")]
    SlotTaken {
        table_id: String,
        date: NaiveDate,
        slot: TimeOfDay,
    },

    #[error("Reservation is {actual}, expected {expected}")]
    StatusConflict {
        expected: ReservationStatus,
        actual: ReservationStatus,
    },

    #[error("Illegal transition {from} -> {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Party size {size} is out of range (1..={max})")]
    PartyOutOfRange { size: u32, max: u32 },
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// 将存储错误转换为错误码（前端负责本地化）
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if matches!(
        e,
        StorageError::Serialization(_) | StorageError::ReservationNotFound(_)
    ) {
        return ErrorCode::InternalError;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }
    ErrorCode::SystemBusy
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Reservation storage error");
                AppError::with_message(code, e.to_string())
            }
            ManagerError::NotFound(id) => AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("Reservation {} not found", id),
            ),
            ManagerError::SlotTaken { table_id, date, slot } => AppError::with_message(
                ErrorCode::SlotConflict,
                format!("Table is no longer available for {} {}", date, slot),
            )
            .with_detail("table_id", table_id),
            ManagerError::StatusConflict { expected, actual } => AppError::with_message(
                ErrorCode::StatusConflict,
                format!(
                    "Reservation is {} but the request expected {}",
                    actual, expected
                ),
            )
            .with_detail("actual_status", actual.as_str()),
            ManagerError::InvalidTransition { from, to } => AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot move a {} reservation to {}", from, to),
            ),
            ManagerError::PartyOutOfRange { size, max } => AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Party size {} is out of range (1..={})", size, max),
            )
            .with_detail("field", "party_size"),
        }
    }
}
