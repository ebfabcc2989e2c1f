/**
 * Industry Services
 * Read operations against industries_master in the main content database.
 */
use serde::Serialize;
use sqlx::MySqlPool;

use crate::db::models::IndustryRow;
use crate::normalize::{ensure_leading_slash, split_list};
use crate::services::log_db_error;

/// Namespace prefix stored in front of every industry path.
const PATH_NAMESPACE: &str = "industry/";

/// Industry entry as rendered by the taxonomy endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub href: String,
    pub market_size: Option<String>,
    pub growth_rate: Option<String>,
    pub overview: Option<String>,
    pub color: Option<String>,
    pub icon_key: Option<String>,
    pub top_players: Vec<String>,
}

impl Industry {
    fn from_row(row: IndustryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: derive_slug(&row.path).to_string(),
            description: row.description,
            href: ensure_leading_slash(&row.path),
            market_size: row.market_size,
            growth_rate: row.growth_rate,
            overview: row.overview,
            color: row.color,
            icon_key: row.icon,
            top_players: split_list(row.top_players.as_deref()),
        }
    }
}

/// Slug is the stored path with the namespace prefix stripped.
fn derive_slug(path: &str) -> &str {
    path.strip_prefix(PATH_NAMESPACE).unwrap_or(path)
}

/// All active industries, alphabetical by display name.
pub async fn fetch_industries(pool: &MySqlPool) -> Result<Vec<Industry>, sqlx::Error> {
    let rows: Vec<IndustryRow> = sqlx::query_as(
        "SELECT \
            im.Id AS id, \
            im.Rephrased_Name AS title, \
            im.Path AS path, \
            im.description AS description, \
            im.marketSize AS market_size, \
            im.growthRate AS growth_rate, \
            im.overview AS overview, \
            im.Color AS color, \
            im.Icon AS icon, \
            im.topPlayers AS top_players \
         FROM industries_master im \
         WHERE im.IsActive = 1 \
         ORDER BY im.Rephrased_Name ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        log_db_error("failed to fetch industries", &e);
        e
    })?;

    tracing::info!(count = rows.len(), "industries fetched");
    Ok(rows.into_iter().map(Industry::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug_strips_namespace_prefix() {
        assert_eq!(derive_slug("industry/fintech"), "fintech");
        assert_eq!(derive_slug("fintech"), "fintech");
    }

    #[test]
    fn test_industry_from_row_shapes_slug_href_and_players() {
        let row = IndustryRow {
            id: 4,
            title: "Financial Technology".to_string(),
            path: "industry/fintech".to_string(),
            description: Some("Payments and banking software.".to_string()),
            market_size: Some("$310B".to_string()),
            growth_rate: Some("14%".to_string()),
            overview: None,
            color: Some("#1A73E8".to_string()),
            icon: Some("bank".to_string()),
            top_players: Some("Stripe, Adyen , Block".to_string()),
        };

        let industry = Industry::from_row(row);
        assert_eq!(industry.slug, "fintech");
        assert_eq!(industry.href, "/industry/fintech");
        assert_eq!(industry.top_players, vec!["Stripe", "Adyen", "Block"]);
        assert_eq!(industry.icon_key.as_deref(), Some("bank"));
    }
}
