/**
 * Health Routes
 * Liveness ping and per-database connectivity checks.
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::db;

/// Single database check result.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for GET /health/databases
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabasesHealth {
    pub main: DatabaseCheck,
    pub report: DatabaseCheck,
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

async fn check(pool: Option<std::sync::Arc<sqlx::MySqlPool>>) -> DatabaseCheck {
    match db::ping(pool).await {
        Ok(elapsed) => DatabaseCheck {
            status: "healthy".to_string(),
            response_time: Some(elapsed.as_millis() as u64),
            error: None,
        },
        Err(e) => DatabaseCheck {
            status: "unhealthy".to_string(),
            response_time: None,
            error: Some(e.to_string()),
        },
    }
}

/// GET /health - simple liveness ping
pub async fn ping() -> impl IntoResponse {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/databases - connectivity of both pools. Always 200; the body
/// carries the per-database status.
pub async fn databases() -> impl IntoResponse {
    let main = check(db::main_pool()).await;
    let report = check(db::report_pool()).await;

    (StatusCode::OK, Json(DatabasesHealth { main, report }))
}
