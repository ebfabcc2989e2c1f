/**
 * Industry Routes
 * Read-only endpoint for the industry taxonomy.
 */
use axum::{http::StatusCode, response::Response};

use crate::db;
use crate::routes::{failure, success};
use crate::services::industries;

/// GET /api/industries - all active industries, alphabetical
pub async fn list() -> Response {
    let Some(pool) = db::main_pool() else {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch industries",
        );
    };

    match industries::fetch_industries(pool.as_ref()).await {
        Ok(items) => success(items),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch industries",
        ),
    }
}
