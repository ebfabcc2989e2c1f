//! market-content-api - library for app wiring and testing
//!
//! Read-only content API: blogs and industries from the main content
//! database, market research reports from the report database.

pub mod db;
pub mod logging;
pub mod normalize;
pub mod routes;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN; with neither
/// set, any origin may read. The API is GET-only.
pub fn configure_cors() -> CorsLayer {
    let origins: Option<Vec<HeaderValue>> = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let parsed: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if parsed.is_empty() {
                None
            } else {
                Some(parsed)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    match origins {
        Some(origins) => cors.allow_origin(origins),
        None => cors.allow_origin(cors::Any),
    }
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        .route("/api/blogs/latest", get(routes::blogs::latest))
        .route("/api/blogs/popular", get(routes::blogs::popular))
        .route("/api/blogs/categories", get(routes::blogs::categories))
        .route("/api/blogs/related", get(routes::blogs::related))
        .route("/api/blogs", get(routes::blogs::list))
        // literal /api/blogs/* routes above win over the slug capture
        .route("/api/blogs/{slug}", get(routes::blogs::detail))
        .route("/api/industries", get(routes::industries::list))
        .route("/api/reports", get(routes::reports::list))
        .route("/api/reports/getHomeReports", get(routes::reports::home))
        .route("/api/reports/related", get(routes::reports::related))
        .route("/health", get(routes::health::ping))
        .route("/health/databases", get(routes::health::databases))
        .fallback(routes::not_found)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        // Anything a handler leaves unhandled becomes the uniform 500 envelope
        .layer(CatchPanicLayer::custom(routes::handle_panic))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    match db::init_pools() {
        Ok(()) => db::test_connections().await,
        Err(e) => tracing::error!(
            error = %e,
            "failed to initialize database pools; queries will fail until restart"
        ),
    }

    let app = create_app();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&body).unwrap();
        (status, value)
    }

    #[test]
    fn test_create_app_returns_router() {
        let _app = create_app();
    }

    #[tokio::test]
    async fn test_unknown_route_gets_404_envelope() {
        let (status, body) = get_json(create_app(), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_related_blogs_validation_runs_through_full_stack() {
        let (status, body) = get_json(create_app(), "/api/blogs/related").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_ping_through_full_stack() {
        let (status, body) = get_json(create_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
