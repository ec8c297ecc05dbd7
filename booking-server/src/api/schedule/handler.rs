//! Schedule API Handlers
//!
//! 周营业时间 + 特殊营业日管理，以及对外的日期解析查询
//! (可订性解析和排班编辑页共用)。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{ResolvedHours, WeeklyHours};

use crate::core::ServerState;
use crate::db::models::{ScheduleOverride, ScheduleOverrideSet};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RestaurantQuery {
    pub restaurant: String,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantDateQuery {
    pub restaurant: String,
    pub date: NaiveDate,
}

/// 周时间表 + 特殊营业日的完整排班视图
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub weekly: WeeklyHours,
    pub overrides: Vec<ScheduleOverride>,
}

async fn ensure_restaurant(state: &ServerState, id: &str) -> AppResult<()> {
    state
        .restaurants()
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RestaurantNotFound,
                format!("Restaurant {} not found", id),
            )
        })?;
    Ok(())
}

/// GET /api/schedule?restaurant= - 完整排班视图
pub async fn get_schedule(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantQuery>,
) -> AppResult<Json<ScheduleResponse>> {
    ensure_restaurant(&state, &query.restaurant).await?;
    let repo = state.schedule.repo();
    let weekly = repo.get_weekly(&query.restaurant).await?;
    let overrides = repo.list_overrides(&query.restaurant).await?;
    Ok(Json(ScheduleResponse { weekly, overrides }))
}

/// PUT /api/schedule/weekly?restaurant= - 替换七天周时间表
pub async fn put_weekly(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantQuery>,
    Json(weekly): Json<WeeklyHours>,
) -> AppResult<Json<WeeklyHours>> {
    ensure_restaurant(&state, &query.restaurant).await?;
    state
        .schedule
        .repo()
        .set_weekly(&query.restaurant, &weekly)
        .await?;
    Ok(Json(weekly))
}

/// PUT /api/schedule/overrides?restaurant= - 设置/替换特殊营业日
pub async fn put_override(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantQuery>,
    Json(payload): Json<ScheduleOverrideSet>,
) -> AppResult<Json<ScheduleOverride>> {
    ensure_restaurant(&state, &query.restaurant).await?;
    let created = state
        .schedule
        .repo()
        .set_override(&query.restaurant, payload.date, payload.hours)
        .await?;
    Ok(Json(created))
}

/// DELETE /api/schedule/overrides?restaurant=&date= - 移除特殊营业日
pub async fn delete_override(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantDateQuery>,
) -> AppResult<Json<bool>> {
    ensure_restaurant(&state, &query.restaurant).await?;
    let removed = state
        .schedule
        .repo()
        .remove_override(&query.restaurant, query.date)
        .await?;
    if !removed {
        return Err(AppError::with_message(
            ErrorCode::OverrideNotFound,
            format!("No override exists for {}", query.date),
        ));
    }
    Ok(Json(true))
}

/// GET /api/schedule/resolved?restaurant=&date= - 解析某日营业窗口
///
/// 特殊营业日优先于周时间表；无法解析的日期视为闭店。
pub async fn get_resolved(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantDateQuery>,
) -> AppResult<Json<ResolvedHours>> {
    ensure_restaurant(&state, &query.restaurant).await?;
    let resolved = state
        .schedule
        .resolved_hours(&query.restaurant, query.date)
        .await?;
    Ok(Json(resolved))
}
