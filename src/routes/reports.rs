/**
 * Report Routes
 * Read-only endpoints for market research reports.
 */
use axum::{extract::Query, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::routes::{failure, resolve_page, success, success_page};
use crate::services::reports::{self, ReportListFilter, ReportSummary};

const HOME_SECTION_COUNT: i64 = 6;
const RELATED_COUNT: i64 = 3;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query parameters for GET /api/reports
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListQuery {
    pub industry_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for GET /api/reports/related
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedReportsQuery {
    pub industry_id: Option<i64>,
    pub exclude_report_id: Option<i64>,
}

/// Payload for GET /api/reports/getHomeReports
#[derive(Debug, Serialize)]
pub struct HomeReports {
    pub latest: Vec<ReportSummary>,
    pub trending: Vec<ReportSummary>,
}

/// GET /api/reports - paginated listing, optionally filtered by industry
pub async fn list(Query(query): Query<ReportListQuery>) -> Response {
    let (page, limit, offset) = resolve_page(query.page, query.limit, DEFAULT_PAGE_SIZE);

    let Some(pool) = db::report_pool() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reports");
    };

    let filter = ReportListFilter {
        industry_id: query.industry_id,
        limit,
        offset,
    };

    match reports::fetch_reports(pool.as_ref(), filter).await {
        Ok(items) => success_page(items, page, limit),
        Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reports"),
    }
}

/// GET /api/reports/getHomeReports - latest six and trending six, fetched
/// concurrently. If either read fails the sibling is cancelled and the whole
/// request fails; no partial data is returned.
pub async fn home() -> Response {
    let Some(pool) = db::report_pool() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reports");
    };

    let joined = tokio::try_join!(
        reports::fetch_latest_reports(pool.as_ref(), HOME_SECTION_COUNT),
        reports::fetch_trending_reports(pool.as_ref(), HOME_SECTION_COUNT),
    );

    match joined {
        Ok((latest, trending)) => {
            tracing::info!(
                latest = latest.len(),
                trending = trending.len(),
                "home reports prepared"
            );
            success(HomeReports { latest, trending })
        }
        Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reports"),
    }
}

/// GET /api/reports/related - reports sharing an industry, optionally
/// excluding one report id. industryId is required.
pub async fn related(Query(query): Query<RelatedReportsQuery>) -> Response {
    let Some(industry_id) = query.industry_id else {
        return failure(StatusCode::BAD_REQUEST, "industryId is required");
    };

    let Some(pool) = db::report_pool() else {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch related reports",
        );
    };

    match reports::fetch_related_reports(
        pool.as_ref(),
        industry_id,
        query.exclude_report_id,
        RELATED_COUNT,
    )
    .await
    {
        Ok(items) => success(items),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch related reports",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/api/reports/related", get(related))
            .route("/api/reports/getHomeReports", get(home))
    }

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

    #[tokio::test]
    async fn test_related_missing_industry_id_is_400() {
        let (status, body) = get_json(test_router(), "/api/reports/related").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "industryId is required");
    }

    #[tokio::test]
    async fn test_home_without_pool_is_uniform_500_envelope() {
        // With no report pool the composite endpoint must fail whole, with
        // the generic envelope and no partial data.
        let (status, body) = get_json(test_router(), "/api/reports/getHomeReports").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch reports");
        assert!(body.get("data").is_none());
    }
}
