//! Database Module
//!
//! Embedded SurrealDB catalog store: restaurants, tables, operating
//! schedules. Reservations live in the redb ledger, not here — see
//! `crate::reservations::storage`.

pub mod models;
pub mod repository;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "mesa";
const DATABASE: &str = "booking";

/// Open the on-disk catalog database
pub async fn connect(path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open catalog database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    tracing::info!(path = %path, "Catalog database opened (SurrealDB/RocksDB)");
    Ok(db)
}

/// Open an in-memory catalog database (tests and ephemeral setups)
pub async fn connect_in_memory() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    Ok(db)
}
