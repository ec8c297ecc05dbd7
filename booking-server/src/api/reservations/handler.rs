//! Reservation API Handlers
//!
//! 创建走「校验 → 解析营业窗口 → 桌台检查 → 原子占位」；生命周期变更
//! 是带 expected_status 的 CAS 操作，错配返回冲突而不是静默覆盖。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{ContactInfo, Reservation, ReservationDraft, ReservationStatus};
use shared::types::TimeOfDay;

use crate::core::ServerState;
use crate::db::models::Restaurant;
use crate::utils::time::{parse_timezone, visit_started};
use crate::utils::validation::{MAX_NOTE_LEN, validate_contact, validate_optional_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListReservationsQuery {
    pub restaurant: String,
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

/// POST /api/reservations 请求体 — 预订向导完成后的单次原子请求
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub restaurant: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub slot: TimeOfDay,
    pub party_size: u32,
    pub contact: ContactInfo,
    pub special_request: Option<String>,
}

/// PATCH /api/reservations/:id 请求体 — 乐观并发的状态变更
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub expected_status: ReservationStatus,
    pub new_status: ReservationStatus,
}

/// GET /api/reservations?restaurant=&date=&status= - 餐厅侧预订列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListReservationsQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state
        .reservations
        .list_for_restaurant(&query.restaurant, query.date, query.status)
        .map_err(AppError::from)?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 预订详情 (确认页)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.reservations.get(&id).map_err(AppError::from)?;
    Ok(Json(reservation))
}

/// POST /api/reservations - 创建预订
///
/// 创建时重新校验可订性 (不止选择时)，关闭「两个并发预订者都看到
/// 空桌」的竞争窗口；占位与写入在同一事务内完成。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<Reservation>> {
    validate_contact(&payload.contact)?;
    validate_optional_text(&payload.special_request, "special_request", MAX_NOTE_LEN)?;

    let restaurant = load_active_restaurant(&state, &payload.restaurant).await?;

    // 时段必须落在解析后的营业窗口内
    state
        .availability
        .ensure_open(&payload.restaurant, payload.date, payload.slot)
        .await?;

    // 桌台检查: 存在、启用、属于该餐厅、容量足够
    let table = state
        .tables()
        .find_by_id(&payload.table_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TableNotFound,
                format!("Table {} not found", payload.table_id),
            )
        })?;
    if !table.is_active {
        return Err(AppError::new(ErrorCode::TableInactive));
    }
    let restaurant_id = restaurant
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    if table.restaurant.to_string() != restaurant_id {
        return Err(AppError::validation(format!(
            "Table {} does not belong to restaurant {}",
            payload.table_id, restaurant_id
        )));
    }
    if table.capacity < payload.party_size {
        return Err(AppError::with_message(
            ErrorCode::TableTooSmall,
            format!(
                "Table {} seats {}, party of {} does not fit",
                table.name, table.capacity, payload.party_size
            ),
        ));
    }

    let draft = ReservationDraft {
        restaurant_id,
        table_id: table.id_string(),
        table_name: table.name.clone(),
        date: payload.date,
        slot: payload.slot,
        party_size: payload.party_size,
        contact: payload.contact,
        special_request: payload
            .special_request
            .filter(|s| !s.trim().is_empty()),
    };

    let reservation = state.reservations.create(draft).map_err(AppError::from)?;
    Ok(Json(reservation))
}

/// PATCH /api/reservations/:id - 生命周期状态变更 (CAS)
///
/// 完成态只能在预订时间已过之后标记 — 这个边界检查属于接口层，
/// 状态机本身不关心时钟。
pub async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<Reservation>> {
    if payload.new_status == ReservationStatus::Completed {
        let reservation = state.reservations.get(&id).map_err(AppError::from)?;
        let tz = restaurant_timezone(&state, &reservation.restaurant_id).await;
        if !visit_started(reservation.date, reservation.slot, tz) {
            return Err(AppError::with_message(
                ErrorCode::VisitNotStarted,
                format!(
                    "Reservation is for {} {}, it cannot be completed yet",
                    reservation.date, reservation.slot
                ),
            ));
        }
    }

    let reservation = state
        .reservations
        .transition(&id, payload.expected_status, payload.new_status)
        .map_err(AppError::from)?;
    Ok(Json(reservation))
}

async fn load_active_restaurant(state: &ServerState, id: &str) -> AppResult<Restaurant> {
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
    Ok(restaurant)
}

/// 餐厅时区；查不到时回退到配置的业务时区
async fn restaurant_timezone(state: &ServerState, restaurant_id: &str) -> chrono_tz::Tz {
    let fallback = state.config.business_timezone;
    match state.restaurants().find_by_id(restaurant_id).await {
        Ok(Some(r)) => parse_timezone(&r.timezone, fallback),
        _ => fallback,
    }
}
