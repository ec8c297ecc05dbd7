//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListTablesQuery {
    /// 餐厅 ID ("restaurant:xxx")
    pub restaurant: String,
}

/// GET /api/tables?restaurant= - 获取餐厅的所有桌台
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListTablesQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables().find_by_restaurant(&query.restaurant).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .tables()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {}", id)))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;

    // 桌台必须挂在存在的餐厅下
    let restaurant_id = payload.restaurant.to_string();
    state
        .restaurants()
        .find_by_id(&restaurant_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {}", restaurant_id)))?;

    let table = state.tables().create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(name) = payload.name.as_ref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;

    let table = state.tables().update(&id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 停用桌台 (软删除，历史预订仍引用它)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state
        .tables()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {}", id)))?;
    let result = state.tables().delete(&id).await?;
    Ok(Json(result))
}
