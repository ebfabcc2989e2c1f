/**
 * Blog Routes
 * Read-only endpoints for blog content.
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::db;
use crate::routes::{failure, resolve_page, success, success_page};
use crate::services::blogs::{self, BlogListFilter};

const LATEST_COUNT: i64 = 4;
const POPULAR_COUNT: i64 = 3;
const RELATED_COUNT: i64 = 3;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Query parameters for GET /api/blogs
#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

/// Query parameters for GET /api/blogs/related
#[derive(Debug, Deserialize)]
pub struct RelatedBlogsQuery {
    pub category: Option<String>,
    pub slug: Option<String>,
}

fn require(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/blogs/latest - four most recently created blogs
pub async fn latest() -> Response {
    let Some(pool) = db::main_pool() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs");
    };

    match blogs::fetch_latest_blogs(pool.as_ref(), LATEST_COUNT).await {
        Ok(items) => success(items),
        Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs"),
    }
}

/// GET /api/blogs - paginated listing, optionally filtered by category
pub async fn list(Query(query): Query<BlogListQuery>) -> Response {
    let (page, limit, offset) = resolve_page(query.page, query.limit, DEFAULT_PAGE_SIZE);

    let Some(pool) = db::main_pool() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs");
    };

    let filter = BlogListFilter {
        limit,
        offset,
        category: query.category.as_deref(),
    };

    match blogs::fetch_blogs(pool.as_ref(), filter).await {
        Ok(items) => success_page(items, page, limit),
        Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs"),
    }
}

/// GET /api/blogs/popular - three most viewed blogs
pub async fn popular() -> Response {
    let Some(pool) = db::main_pool() else {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch popular blogs",
        );
    };

    match blogs::fetch_popular_blogs(pool.as_ref(), POPULAR_COUNT).await {
        Ok(items) => success(items),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch popular blogs",
        ),
    }
}

/// GET /api/blogs/categories - distinct categories of published blogs
pub async fn categories() -> Response {
    let Some(pool) = db::main_pool() else {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch blog categories",
        );
    };

    match blogs::fetch_blog_categories(pool.as_ref()).await {
        Ok(items) => success(items),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch blog categories",
        ),
    }
}

/// GET /api/blogs/related - blogs sharing a category, excluding one slug.
/// Both parameters are required; validation happens before any database
/// access.
pub async fn related(Query(query): Query<RelatedBlogsQuery>) -> Response {
    let (Some(category), Some(slug)) = (require(query.category), require(query.slug)) else {
        return failure(StatusCode::BAD_REQUEST, "category and slug are required");
    };

    let Some(pool) = db::main_pool() else {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch related blogs",
        );
    };

    match blogs::fetch_related_blogs(pool.as_ref(), &category, &slug, RELATED_COUNT).await {
        Ok(items) => success(items),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch related blogs",
        ),
    }
}

/// GET /api/blogs/{slug} - blog detail by slug
pub async fn detail(Path(slug): Path<String>) -> Response {
    let Some(pool) = db::main_pool() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blog");
    };

    match blogs::fetch_blog_by_slug(pool.as_ref(), &slug).await {
        Ok(Some(blog)) => success(blog),
        Ok(None) => failure(StatusCode::NOT_FOUND, "Blog not found"),
        Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blog"),
    }
}
