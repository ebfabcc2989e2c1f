//! Database Models - row shapes read from the external content stores.
//!
//! The databases are owned by a separate ingestion process; these structs are
//! contracts over the columns each query selects, not managed entities.

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Blog row as selected for list contexts (summaries).
#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: Option<String>,
    pub category_slug: Option<String>,
    pub author_name: Option<String>,
    pub publish_date: Option<NaiveDateTime>,
    pub read_time: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub is_featured: bool,
}

/// Blog row as selected for the detail context, including the serialized
/// structured-content columns.
#[derive(Debug, Clone, FromRow)]
pub struct BlogDetailRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: Option<String>,
    pub category_slug: Option<String>,
    pub author_name: Option<String>,
    pub author_role: Option<String>,
    pub author_avatar: Option<String>,
    pub author_bio: Option<String>,
    pub publish_date: Option<NaiveDateTime>,
    pub read_time: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub introduction: Option<String>,
    pub sections: Option<String>,
    pub key_takeaways: Option<String>,
    pub quote: Option<String>,
    pub tags: Option<String>,
    pub views: i64,
    pub is_featured: bool,
}

/// Report row joined with its market metrics. `effective_date` is
/// COALESCE(updated, created) computed server-side in the report database.
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub industry_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub path: Option<String>,
    pub price: Option<String>,
    pub effective_date: Option<NaiveDateTime>,
    pub cagr: Option<String>,
    pub market_reach: Option<String>,
}

/// Slim report row for the related-reports listing.
#[derive(Debug, Clone, FromRow)]
pub struct RelatedReportRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub path: Option<String>,
}

/// Industry taxonomy row.
#[derive(Debug, Clone, FromRow)]
pub struct IndustryRow {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub description: Option<String>,
    pub market_size: Option<String>,
    pub growth_rate: Option<String>,
    pub overview: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub top_players: Option<String>,
}
