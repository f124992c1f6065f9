//! MCP tool implementations

pub mod foods;
pub mod goals;
pub mod meals;
pub mod profile;
pub mod remote;
pub mod status;
pub mod tips;
pub mod water;

use chrono::{NaiveDate, Utc};

/// Parse an ISO date, defaulting to today's UTC date
pub(crate) fn resolve_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", raw)),
        None => Ok(Utc::now().date_naive()),
    }
}

pub(crate) fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date() {
        assert_eq!(
            resolve_date(Some("2025-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(resolve_date(Some("  ")).unwrap(), Utc::now().date_naive());
        assert!(resolve_date(Some("01/03/2025")).is_err());
    }
}
