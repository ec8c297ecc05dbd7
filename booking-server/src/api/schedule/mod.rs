//! Schedule API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/schedule", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_schedule))
        .route("/weekly", put(handler::put_weekly))
        .route(
            "/overrides",
            put(handler::put_override).delete(handler::delete_override),
        )
        .route("/resolved", get(handler::get_resolved))
}
