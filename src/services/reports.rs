/**
 * Report Services
 * Read operations against report_master joined with report_market_metrics,
 * all on the report pool. The metrics join happens inside the report
 * database; there is no cross-database join.
 */
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use std::cmp::Ordering;

use crate::db::models::{RelatedReportRow, ReportRow};
use crate::normalize::{ensure_leading_slash, format_date_short, format_price, normalize_growth, sanitize_title};
use crate::services::log_db_error;

/// Image served when a report row has no stored image path.
const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Columns shared by the joined report queries, aliased to match [`ReportRow`].
const REPORT_COLUMNS: &str = "\
    rm.Id AS id, \
    rm.IndustryId AS industry_id, \
    rm.Name AS name, \
    rm.Description AS description, \
    rm.Path AS path, \
    CAST(rm.Single_User_Prize AS CHAR) AS price, \
    COALESCE(rm.UpdateAt, rm.CreateAt) AS effective_date, \
    rmm.cagr AS cagr, \
    rmm.market_reach AS market_reach";

lazy_static! {
    /// Percentage shape a CAGR string must match to count toward trending:
    /// optional sign, digits, optional decimal part, literal percent sign.
    static ref CAGR_PATTERN: Regex = Regex::new(r"^[+-]?\d+(\.\d+)?%$").unwrap();
}

/// Report summary as rendered in list contexts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: i64,
    pub industry_id: Option<i64>,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub growth: Option<String>,
    pub market_reach: Option<String>,
    pub price: Option<String>,
}

impl ReportSummary {
    fn from_row(row: ReportRow) -> Self {
        Self {
            id: row.id,
            industry_id: row.industry_id,
            title: sanitize_title(&row.name),
            slug: row.path.as_deref().map(ensure_leading_slash),
            description: row.description,
            date: row.effective_date.as_ref().map(format_date_short),
            growth: normalize_growth(row.cagr.as_deref()),
            market_reach: row.market_reach,
            price: format_price(row.price.as_deref()),
        }
    }
}

/// Slim report shape for the related-reports listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedReport {
    pub id: i64,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: String,
}

impl RelatedReport {
    fn from_row(row: RelatedReportRow) -> Self {
        Self {
            id: row.id,
            title: sanitize_title(&row.name),
            slug: row.path.as_deref().map(ensure_leading_slash),
            description: row.description,
            image: row
                .image_path
                .as_deref()
                .map(ensure_leading_slash)
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Filters for the paginated report listing.
#[derive(Debug)]
pub struct ReportListFilter {
    pub industry_id: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// Active reports by effective date descending.
pub async fn fetch_latest_reports(
    pool: &MySqlPool,
    limit: i64,
) -> Result<Vec<ReportSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} \
         FROM report_master rm \
         LEFT JOIN report_market_metrics rmm ON rmm.report_id = rm.Id \
         WHERE rm.IsActive = 1 \
         ORDER BY COALESCE(rm.UpdateAt, rm.CreateAt) DESC \
         LIMIT ?"
    );

    let rows: Vec<ReportRow> = sqlx::query_as(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log_db_error("failed to fetch latest reports", &e);
            e
        })?;

    tracing::info!(count = rows.len(), "latest reports fetched");
    Ok(rows.into_iter().map(ReportSummary::from_row).collect())
}

/// Active reports ordered by numeric CAGR descending. Rows whose CAGR string
/// is not a well-formed percentage are silently excluded, never errored.
pub async fn fetch_trending_reports(
    pool: &MySqlPool,
    limit: i64,
) -> Result<Vec<ReportSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} \
         FROM report_master rm \
         INNER JOIN report_market_metrics rmm ON rmm.report_id = rm.Id \
         WHERE rm.IsActive = 1 AND rmm.cagr IS NOT NULL AND rmm.cagr != ''"
    );

    let rows: Vec<ReportRow> = sqlx::query_as(&sql).fetch_all(pool).await.map_err(|e| {
        log_db_error("failed to fetch trending reports", &e);
        e
    })?;

    let ranked = rank_by_cagr(rows, limit.max(0) as usize);
    tracing::info!(count = ranked.len(), "trending reports ranked by CAGR");
    Ok(ranked.into_iter().map(ReportSummary::from_row).collect())
}

/// Paginated active reports, optionally restricted to one industry.
pub async fn fetch_reports(
    pool: &MySqlPool,
    filter: ReportListFilter,
) -> Result<Vec<ReportSummary>, sqlx::Error> {
    let mut query = QueryBuilder::<MySql>::new(format!(
        "SELECT {REPORT_COLUMNS} \
         FROM report_master rm \
         LEFT JOIN report_market_metrics rmm ON rmm.report_id = rm.Id \
         WHERE rm.IsActive = 1"
    ));

    if let Some(industry_id) = filter.industry_id {
        query.push(" AND rm.IndustryId = ").push_bind(industry_id);
    }

    query.push(" ORDER BY COALESCE(rm.UpdateAt, rm.CreateAt) DESC LIMIT ");
    query.push_bind(filter.limit);
    query.push(" OFFSET ");
    query.push_bind(filter.offset);

    let rows: Vec<ReportRow> = query.build_query_as().fetch_all(pool).await.map_err(|e| {
        log_db_error("failed to fetch reports", &e);
        e
    })?;

    tracing::info!(
        count = rows.len(),
        industry_id = ?filter.industry_id,
        limit = filter.limit,
        offset = filter.offset,
        "reports fetched with market metrics"
    );
    Ok(rows.into_iter().map(ReportSummary::from_row).collect())
}

/// Active reports sharing an industry, newest first, optionally excluding
/// one report id. The excluded id never appears in the result set.
pub async fn fetch_related_reports(
    pool: &MySqlPool,
    industry_id: i64,
    exclude_report_id: Option<i64>,
    limit: i64,
) -> Result<Vec<RelatedReport>, sqlx::Error> {
    let mut query = QueryBuilder::<MySql>::new(
        "SELECT \
            rm.Id AS id, \
            rm.Name AS name, \
            rm.Description AS description, \
            rm.ImagePath AS image_path, \
            rm.Path AS path \
         FROM report_master rm \
         WHERE rm.IsActive = 1 AND rm.IndustryId = ",
    );
    query.push_bind(industry_id);

    if let Some(exclude_id) = exclude_report_id {
        query.push(" AND rm.Id != ").push_bind(exclude_id);
    }

    query.push(" ORDER BY rm.CreateAt DESC LIMIT ");
    query.push_bind(limit);

    let rows: Vec<RelatedReportRow> =
        query.build_query_as().fetch_all(pool).await.map_err(|e| {
            log_db_error("failed to fetch related reports", &e);
            e
        })?;

    tracing::info!(
        count = rows.len(),
        industry_id,
        exclude_report_id = ?exclude_report_id,
        "related reports fetched"
    );
    Ok(rows.into_iter().map(RelatedReport::from_row).collect())
}

/// Numeric value of a well-formed CAGR string; None for anything else.
fn cagr_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !CAGR_PATTERN.is_match(trimmed) {
        return None;
    }
    trimmed
        .trim_end_matches('%')
        .trim_start_matches('+')
        .parse()
        .ok()
}

/// Drop rows without a parseable CAGR and order the rest by numeric CAGR
/// descending, truncated to `limit`.
fn rank_by_cagr(rows: Vec<ReportRow>, limit: usize) -> Vec<ReportRow> {
    let mut ranked: Vec<(f64, ReportRow)> = rows
        .into_iter()
        .filter_map(|row| {
            let value = cagr_value(row.cagr.as_deref()?)?;
            Some((value, row))
        })
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report_row(id: i64, cagr: Option<&str>) -> ReportRow {
        ReportRow {
            id,
            industry_id: Some(2),
            name: "\"AI Chips Market | Forecast.\"".to_string(),
            description: Some("Silicon demand outlook.".to_string()),
            path: Some("reports/ai-chips".to_string()),
            price: Some("4999".to_string()),
            effective_date: NaiveDate::from_ymd_opt(2025, 6, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            cagr: cagr.map(str::to_string),
            market_reach: Some("Global".to_string()),
        }
    }

    #[test]
    fn test_cagr_value_accepts_percentages_only() {
        assert_eq!(cagr_value("7.25%"), Some(7.25));
        assert_eq!(cagr_value("+12%"), Some(12.0));
        assert_eq!(cagr_value("-3%"), Some(-3.0));
        assert_eq!(cagr_value(" 3% "), Some(3.0));
        assert_eq!(cagr_value("abc"), None);
        assert_eq!(cagr_value(""), None);
        assert_eq!(cagr_value("12.5"), None);
    }

    #[test]
    fn test_rank_by_cagr_excludes_malformed_and_orders_descending() {
        let rows = vec![
            report_row(1, Some("3%")),
            report_row(2, Some("abc")),
            report_row(3, Some("7.25%")),
            report_row(4, Some("")),
            report_row(5, None),
        ];

        let ranked = rank_by_cagr(rows, 10);
        let ids: Vec<i64> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_rank_by_cagr_truncates_to_limit() {
        let rows = vec![
            report_row(1, Some("3%")),
            report_row(2, Some("9%")),
            report_row(3, Some("7.25%")),
        ];

        let ranked = rank_by_cagr(rows, 2);
        let ids: Vec<i64> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_summary_normalizes_title_slug_growth_and_price() {
        let summary = ReportSummary::from_row(report_row(1, Some("7.25%")));
        assert_eq!(summary.title, "AI Chips Market");
        assert_eq!(summary.slug.as_deref(), Some("/reports/ai-chips"));
        assert_eq!(summary.growth.as_deref(), Some("+7.25%"));
        assert_eq!(summary.price.as_deref(), Some("$4,999"));
        assert_eq!(summary.date.as_deref(), Some("Jun 1, 2025"));
    }

    #[test]
    fn test_related_report_falls_back_to_placeholder_image() {
        let row = RelatedReportRow {
            id: 9,
            name: "Healthcare Cloud.".to_string(),
            description: None,
            image_path: None,
            path: Some("reports/healthcare-cloud".to_string()),
        };

        let related = RelatedReport::from_row(row);
        assert_eq!(related.image, "/placeholder.svg");
        assert_eq!(related.title, "Healthcare Cloud");
        assert_eq!(related.slug.as_deref(), Some("/reports/healthcare-cloud"));
    }
}
