/**
 * Blog Services
 * Read operations against blog_master in the main content database.
 */
use serde::Serialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::db::models::{BlogDetailRow, BlogRow};
use crate::normalize::{
    format_date_long, format_date_short, parse_json_list, parse_json_value, split_list,
};
use crate::services::log_db_error;

/// Related summaries attached to a blog detail.
const RELATED_COUNT: i64 = 3;

/// Columns shared by every summary query, aliased to match [`BlogRow`].
const SUMMARY_COLUMNS: &str = "\
    bm.id AS id, \
    bm.title AS title, \
    bm.slug AS slug, \
    bm.category AS category, \
    bm.category_slug AS category_slug, \
    bm.author_name AS author_name, \
    bm.publish_date AS publish_date, \
    bm.read_time AS read_time, \
    bm.featured_image AS featured_image, \
    bm.excerpt AS excerpt, \
    bm.is_featured AS is_featured";

/// Blog summary as rendered in list contexts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: Option<String>,
    pub category_slug: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub image: Option<String>,
    pub excerpt: Option<String>,
    pub featured: bool,
}

impl BlogSummary {
    fn from_row(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            category: row.category,
            category_slug: row.category_slug,
            author: row.author_name,
            date: row.publish_date.as_ref().map(format_date_short),
            read_time: row.read_time,
            image: row.featured_image,
            excerpt: row.excerpt,
            featured: row.is_featured,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogAuthor {
    pub name: Option<String>,
    pub role: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// Full blog as rendered by the detail endpoint, with the serialized content
/// columns decoded and up to three related summaries attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: Option<String>,
    pub category_slug: Option<String>,
    pub author: BlogAuthor,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub image: Option<String>,
    pub excerpt: Option<String>,
    pub introduction: Option<String>,
    pub sections: Option<serde_json::Value>,
    pub key_takeaways: Vec<String>,
    pub quote: Option<serde_json::Value>,
    pub tags: Vec<String>,
    pub views: i64,
    pub featured: bool,
    pub related: Vec<BlogSummary>,
}

impl BlogDetail {
    fn from_row(row: BlogDetailRow, related: Vec<BlogSummary>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            category: row.category,
            category_slug: row.category_slug,
            author: BlogAuthor {
                name: row.author_name,
                role: row.author_role,
                avatar: row.author_avatar,
                bio: row.author_bio,
            },
            date: row.publish_date.as_ref().map(format_date_long),
            read_time: row.read_time,
            image: row.featured_image,
            excerpt: row.excerpt,
            introduction: row.introduction,
            sections: parse_json_value(row.sections.as_deref()),
            key_takeaways: parse_json_list(row.key_takeaways.as_deref()),
            quote: parse_json_value(row.quote.as_deref()),
            tags: split_list(row.tags.as_deref()),
            views: row.views,
            featured: row.is_featured,
            related,
        }
    }
}

/// Distinct category of published blogs.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub name: String,
    pub slug: Option<String>,
}

/// Filters for the paginated blog listing.
#[derive(Debug)]
pub struct BlogListFilter<'a> {
    pub limit: i64,
    pub offset: i64,
    pub category: Option<&'a str>,
}

/// Most recently created published blogs.
pub async fn fetch_latest_blogs(
    pool: &MySqlPool,
    limit: i64,
) -> Result<Vec<BlogSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} \
         FROM blog_master bm \
         WHERE bm.status = 'published' \
         ORDER BY bm.created_at DESC \
         LIMIT ?"
    );

    let rows: Vec<BlogRow> = sqlx::query_as(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log_db_error("failed to fetch latest blogs", &e);
            e
        })?;

    tracing::info!(count = rows.len(), "latest blogs fetched");
    Ok(rows.into_iter().map(BlogSummary::from_row).collect())
}

/// Paginated published blogs, optionally restricted to one category.
/// Featured rows sort first, ties broken by publish date descending.
pub async fn fetch_blogs(
    pool: &MySqlPool,
    filter: BlogListFilter<'_>,
) -> Result<Vec<BlogSummary>, sqlx::Error> {
    let mut query = QueryBuilder::<MySql>::new(format!(
        "SELECT {SUMMARY_COLUMNS} FROM blog_master bm WHERE bm.status = 'published'"
    ));

    if let Some(category) = filter.category {
        query.push(" AND bm.category_slug = ").push_bind(category);
    }

    query.push(" ORDER BY bm.is_featured DESC, bm.publish_date DESC LIMIT ");
    query.push_bind(filter.limit);
    query.push(" OFFSET ");
    query.push_bind(filter.offset);

    let rows: Vec<BlogRow> = query.build_query_as().fetch_all(pool).await.map_err(|e| {
        log_db_error("failed to fetch blogs", &e);
        e
    })?;

    tracing::info!(
        count = rows.len(),
        category = ?filter.category,
        limit = filter.limit,
        offset = filter.offset,
        "blogs fetched"
    );
    Ok(rows.into_iter().map(BlogSummary::from_row).collect())
}

/// Most viewed published blogs.
pub async fn fetch_popular_blogs(
    pool: &MySqlPool,
    limit: i64,
) -> Result<Vec<BlogSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} \
         FROM blog_master bm \
         WHERE bm.status = 'published' \
         ORDER BY bm.views DESC \
         LIMIT ?"
    );

    let rows: Vec<BlogRow> = sqlx::query_as(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log_db_error("failed to fetch popular blogs", &e);
            e
        })?;

    tracing::info!(count = rows.len(), "popular blogs fetched");
    Ok(rows.into_iter().map(BlogSummary::from_row).collect())
}

/// Distinct categories of published blogs, alphabetical.
pub async fn fetch_blog_categories(pool: &MySqlPool) -> Result<Vec<BlogCategory>, sqlx::Error> {
    let categories: Vec<BlogCategory> = sqlx::query_as(
        "SELECT DISTINCT bm.category AS name, bm.category_slug AS slug \
         FROM blog_master bm \
         WHERE bm.status = 'published' AND bm.category IS NOT NULL AND bm.category != '' \
         ORDER BY bm.category ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        log_db_error("failed to fetch blog categories", &e);
        e
    })?;

    tracing::info!(count = categories.len(), "blog categories fetched");
    Ok(categories)
}

/// Published blogs sharing a category, with one slug excluded. The excluded
/// slug never appears in the result set.
pub async fn fetch_related_blogs(
    pool: &MySqlPool,
    category_slug: &str,
    exclude_slug: &str,
    limit: i64,
) -> Result<Vec<BlogSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} \
         FROM blog_master bm \
         WHERE bm.status = 'published' AND bm.category_slug = ? AND bm.slug != ? \
         ORDER BY bm.publish_date DESC \
         LIMIT ?"
    );

    let rows: Vec<BlogRow> = sqlx::query_as(&sql)
        .bind(category_slug)
        .bind(exclude_slug)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log_db_error("failed to fetch related blogs", &e);
            e
        })?;

    tracing::info!(
        count = rows.len(),
        category_slug,
        exclude_slug,
        "related blogs fetched"
    );
    Ok(rows.into_iter().map(BlogSummary::from_row).collect())
}

/// Published blog by slug, or None. A found blog carries up to three related
/// summaries from the same category.
pub async fn fetch_blog_by_slug(
    pool: &MySqlPool,
    slug: &str,
) -> Result<Option<BlogDetail>, sqlx::Error> {
    let row: Option<BlogDetailRow> = sqlx::query_as(
        "SELECT \
            bm.id AS id, \
            bm.title AS title, \
            bm.slug AS slug, \
            bm.category AS category, \
            bm.category_slug AS category_slug, \
            bm.author_name AS author_name, \
            bm.author_role AS author_role, \
            bm.author_avatar AS author_avatar, \
            bm.author_bio AS author_bio, \
            bm.publish_date AS publish_date, \
            bm.read_time AS read_time, \
            bm.featured_image AS featured_image, \
            bm.excerpt AS excerpt, \
            bm.introduction AS introduction, \
            bm.sections AS sections, \
            bm.key_takeaways AS key_takeaways, \
            bm.quote AS quote, \
            bm.tags AS tags, \
            bm.views AS views, \
            bm.is_featured AS is_featured \
         FROM blog_master bm \
         WHERE bm.slug = ? AND bm.status = 'published'",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        log_db_error("failed to fetch blog by slug", &e);
        e
    })?;

    let Some(row) = row else {
        tracing::info!(slug, "blog not found");
        return Ok(None);
    };

    let related = match row.category_slug.as_deref() {
        Some(category) => fetch_related_blogs(pool, category, &row.slug, RELATED_COUNT).await?,
        None => Vec::new(),
    };

    tracing::info!(slug, related = related.len(), "blog detail fetched");
    Ok(Some(BlogDetail::from_row(row, related)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary_row() -> BlogRow {
        BlogRow {
            id: 7,
            title: "Cloud Spend in 2025".to_string(),
            slug: "cloud-spend-2025".to_string(),
            category: Some("Technology".to_string()),
            category_slug: Some("technology".to_string()),
            author_name: Some("Dana Reyes".to_string()),
            publish_date: NaiveDate::from_ymd_opt(2025, 3, 2)
                .and_then(|d| d.and_hms_opt(8, 0, 0)),
            read_time: Some("6 min read".to_string()),
            featured_image: Some("/images/cloud.png".to_string()),
            excerpt: Some("Where the money goes.".to_string()),
            is_featured: true,
        }
    }

    #[test]
    fn test_summary_uses_short_date_and_stored_flag() {
        let summary = BlogSummary::from_row(summary_row());
        assert_eq!(summary.date.as_deref(), Some("Mar 2, 2025"));
        assert!(summary.featured);
        assert_eq!(summary.author.as_deref(), Some("Dana Reyes"));
    }

    #[test]
    fn test_detail_decodes_serialized_content() {
        let row = BlogDetailRow {
            id: 7,
            title: "Cloud Spend in 2025".to_string(),
            slug: "cloud-spend-2025".to_string(),
            category: Some("Technology".to_string()),
            category_slug: Some("technology".to_string()),
            author_name: Some("Dana Reyes".to_string()),
            author_role: Some("Analyst".to_string()),
            author_avatar: None,
            author_bio: None,
            publish_date: NaiveDate::from_ymd_opt(2025, 3, 2)
                .and_then(|d| d.and_hms_opt(8, 0, 0)),
            read_time: Some("6 min read".to_string()),
            featured_image: None,
            excerpt: None,
            introduction: Some("Intro.".to_string()),
            sections: Some("[{\"heading\":\"Costs\",\"body\":\"...\"}]".to_string()),
            key_takeaways: Some("[\"Spend is up\",\"Multi-cloud grows\"]".to_string()),
            quote: Some("not valid json".to_string()),
            tags: Some("cloud, finops".to_string()),
            views: 1280,
            is_featured: false,
        };

        let detail = BlogDetail::from_row(row, Vec::new());
        assert_eq!(detail.date.as_deref(), Some("March 2, 2025"));
        assert!(detail.sections.is_some());
        assert_eq!(detail.key_takeaways.len(), 2);
        assert!(detail.quote.is_none());
        assert_eq!(detail.tags, vec!["cloud", "finops"]);
        assert_eq!(detail.author.role.as_deref(), Some("Analyst"));
    }
}
