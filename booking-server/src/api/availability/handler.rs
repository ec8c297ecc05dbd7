//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::SlotAvailability;
use shared::types::TimeOfDay;

use crate::core::ServerState;
use crate::db::models::DiningTable;
use crate::utils::{AppError, AppResult};

fn default_party_size() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub restaurant: String,
    pub date: NaiveDate,
    /// 缺省为 1: 只要有任意空桌，时段即视为可订
    #[serde(default = "default_party_size")]
    pub party_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct TablesQuery {
    pub restaurant: String,
    pub date: NaiveDate,
    pub slot: TimeOfDay,
    pub party_size: u32,
}

async fn ensure_active_restaurant(state: &ServerState, id: &str) -> AppResult<()> {
    let restaurant = state
        .restaurants()
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RestaurantNotFound,
                format!("Restaurant {} not found", id),
            )
        })?;
    if !restaurant.is_active {
        return Err(AppError::new(ErrorCode::RestaurantInactive));
    }
    Ok(())
}

/// GET /api/availability?restaurant=&date=&party_size= - 当日时段及可订标记
///
/// 闭店日返回空列表 (正常展示状态，不是错误)。
pub async fn list_slots(
    State(state): State<ServerState>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    ensure_active_restaurant(&state, &query.restaurant).await?;
    let slots = state
        .availability
        .list_slots(&query.restaurant, query.date, query.party_size)
        .await?;
    Ok(Json(slots))
}

/// GET /api/availability/tables?restaurant=&date=&slot=&party_size= - 可订桌台 (排序后)
pub async fn list_tables(
    State(state): State<ServerState>,
    Query(query): Query<TablesQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    ensure_active_restaurant(&state, &query.restaurant).await?;
    if query.party_size == 0 {
        return Err(AppError::out_of_range("party_size must be at least 1"));
    }
    let tables = state
        .availability
        .list_tables(&query.restaurant, query.date, query.slot, query.party_size)
        .await?;
    Ok(Json(tables))
}
