//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅管理接口
//! - [`tables`] - 桌台管理接口
//! - [`schedule`] - 营业时间管理与解析接口
//! - [`availability`] - 可订时段/桌台查询接口
//! - [`reservations`] - 预订创建与生命周期接口

pub mod availability;
pub mod health;
pub mod reservations;
pub mod restaurants;
pub mod schedule;
pub mod tables;

use crate::core::ServerState;
use axum::Router;

/// Assemble all API routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(tables::router())
        .merge(schedule::router())
        .merge(availability::router())
        .merge(reservations::router())
}
