//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`ApiResponse`] - 错误与响应类型 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 业务时区与日期工具
//! - [`validation`] - 输入校验

pub mod logger;
pub mod time;
pub mod validation;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
