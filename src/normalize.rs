/**
 * Normalization helpers
 * Pure transforms applied to raw database values before they reach the wire.
 */
use chrono::NaiveDateTime;

/// Clean a report or blog title for frontend usage: trim, strip one layer of
/// matching wrapping quotes, drop everything after the first `|`, and strip a
/// single trailing period.
pub fn sanitize_title(title: &str) -> String {
    let mut clean = title.trim();

    if clean.len() >= 2 {
        let first = clean.chars().next();
        let last = clean.chars().last();
        if (first == Some('"') && last == Some('"'))
            || (first == Some('\'') && last == Some('\''))
        {
            clean = &clean[1..clean.len() - 1];
        }
    }

    if let Some((head, _)) = clean.split_once('|') {
        clean = head;
    }

    let clean = clean.trim();
    clean.strip_suffix('.').unwrap_or(clean).to_string()
}

/// Short date form used in list contexts, e.g. "Jan 5, 2025".
pub fn format_date_short(date: &NaiveDateTime) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Long date form used in detail contexts, e.g. "January 5, 2025".
/// Kept separate from [`format_date_short`]; the two contexts render
/// independently.
pub fn format_date_long(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Normalize a growth/CAGR string so it carries exactly one leading sign and
/// one trailing percent sign. Idempotent; empty or absent input maps to None.
pub fn normalize_growth(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    let signed = if value.starts_with('+') || value.starts_with('-') {
        value.to_string()
    } else {
        format!("+{value}")
    };

    if signed.contains('%') {
        Some(signed)
    } else {
        Some(format!("{signed}%"))
    }
}

/// Render a raw price value as a dollar string with thousands separators.
/// Null, zero, and unparseable input all map to None.
pub fn format_price(raw: Option<&str>) -> Option<String> {
    let value: f64 = raw?.trim().parse().ok()?;
    if value == 0.0 {
        return None;
    }

    let rendered = format!("{:.2}", value.abs());
    let (whole, cents) = match rendered.split_once('.') {
        Some(parts) => parts,
        None => (rendered.as_str(), "00"),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = group_thousands(whole);
    if cents == "00" {
        Some(format!("{sign}${grouped}"))
    } else {
        Some(format!("{sign}${grouped}.{cents}"))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Split a comma-delimited column into a trimmed list, dropping empty
/// elements. Absent input maps to an empty list.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Decode a serialized JSON column. Malformed or empty input maps to None.
pub fn parse_json_value(raw: Option<&str>) -> Option<serde_json::Value> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

/// Decode a serialized JSON list of strings. Anything that is not one maps to
/// an empty list.
pub fn parse_json_list(raw: Option<&str>) -> Vec<String> {
    parse_json_value(raw)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

/// Prefix a stored path with `/` unless it already starts with one.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_sanitize_title_strips_quotes_pipe_and_period() {
        assert_eq!(
            sanitize_title("\"Market Report | 2024.\""),
            "Market Report"
        );
    }

    #[test]
    fn test_sanitize_title_clean_input_passes_through() {
        assert_eq!(sanitize_title("Clean Title"), "Clean Title");
    }

    #[test]
    fn test_sanitize_title_single_quotes_and_trailing_period() {
        assert_eq!(sanitize_title("'Fintech Outlook.'"), "Fintech Outlook");
    }

    #[test]
    fn test_sanitize_title_unmatched_quote_is_kept() {
        assert_eq!(sanitize_title("\"Partial"), "\"Partial");
    }

    #[test]
    fn test_format_date_short() {
        assert_eq!(format_date_short(&date(2025, 1, 5)), "Jan 5, 2025");
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(format_date_long(&date(2025, 1, 5)), "January 5, 2025");
    }

    #[test]
    fn test_normalize_growth_adds_sign_and_percent() {
        assert_eq!(normalize_growth(Some("12.5")).as_deref(), Some("+12.5%"));
    }

    #[test]
    fn test_normalize_growth_is_idempotent() {
        assert_eq!(
            normalize_growth(Some("+12.50%")).as_deref(),
            Some("+12.50%")
        );
        assert_eq!(normalize_growth(Some("-3%")).as_deref(), Some("-3%"));
    }

    #[test]
    fn test_normalize_growth_empty_maps_to_none() {
        assert_eq!(normalize_growth(Some("   ")), None);
        assert_eq!(normalize_growth(None), None);
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Some("4999")).as_deref(), Some("$4,999"));
        assert_eq!(
            format_price(Some("1234567.5")).as_deref(),
            Some("$1,234,567.50")
        );
    }

    #[test]
    fn test_format_price_zero_and_invalid_map_to_none() {
        assert_eq!(format_price(Some("0")), None);
        assert_eq!(format_price(Some("n/a")), None);
        assert_eq!(format_price(None), None);
    }

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list(Some("IBM, Google , ,Microsoft")),
            vec!["IBM", "Google", "Microsoft"]
        );
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_parse_json_list_handles_malformed_input() {
        assert_eq!(
            parse_json_list(Some("[\"a\",\"b\"]")),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_json_list(Some("not json")).is_empty());
        assert!(parse_json_list(None).is_empty());
    }

    #[test]
    fn test_parse_json_value_malformed_maps_to_none() {
        assert!(parse_json_value(Some("{broken")).is_none());
        assert!(parse_json_value(Some("{\"a\":1}")).is_some());
    }

    #[test]
    fn test_ensure_leading_slash() {
        assert_eq!(ensure_leading_slash("industry/fintech"), "/industry/fintech");
        assert_eq!(ensure_leading_slash("/already"), "/already");
    }
}
