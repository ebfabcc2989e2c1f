/**
 * Routes Module
 * API route handlers and the uniform response envelope.
 */
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

pub mod blogs;
pub mod health;
pub mod industries;
pub mod reports;

/// Hard server-side cap on any requested page size.
pub const MAX_PAGE_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

/// Success envelope: `{success: true, data, pagination?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Failure envelope: `{success: false, message}`.
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
}

pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data,
            pagination: None,
        }),
    )
        .into_response()
}

pub fn success_page<T: Serialize>(data: T, page: i64, limit: i64) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data,
            pagination: Some(Pagination { page, limit }),
        }),
    )
        .into_response()
}

pub fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(FailureEnvelope {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Effective (page, limit, offset) for a list request. The limit is clamped
/// to [`MAX_PAGE_LIMIT`] no matter what the client asked for.
pub fn resolve_page(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);
    (page, limit, (page - 1) * limit)
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Not Found")
}

/// Catch-panic hook: anything a handler fails to handle becomes the uniform
/// 500 envelope, with no internal detail leaked.
pub fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
