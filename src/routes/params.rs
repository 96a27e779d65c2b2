use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(15).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

/// The year filter arrives as a string on every reporting page; absent or
/// empty means "all years", anything non-numeric is rejected.
pub fn parse_year_filter(raw: Option<&str>) -> AppResult<Option<i32>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid year filter: {value}"))),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct YearQuery {
    pub year: Option<String>,
}

impl YearQuery {
    pub fn parsed(&self) -> AppResult<Option<i32>> {
        parse_year_filter(self.year.as_deref())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RankingQuery {
    pub n: Option<i64>,
    pub year: Option<String>,
}

impl RankingQuery {
    pub fn limit(&self) -> i64 {
        self.n.unwrap_or(10).clamp(1, 100)
    }

    pub fn parsed_year(&self) -> AppResult<Option<i32>> {
        parse_year_filter(self.year.as_deref())
    }
}

/// Customer list filters; like the original search form they are mutually
/// exclusive, first match wins: name, then country, then contact, then city.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub name: Option<String>,
    pub country: Option<String>,
    pub contact: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Optional comparison expression, e.g. `12.50`, `>=10`, `<25.00`.
    pub price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFilter {
    pub op: PriceOp,
    pub value: Decimal,
}

impl PriceFilter {
    /// Parse a price expression: an optional comparison operator followed by
    /// a decimal. A bare number means equality.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let (op, rest) = if let Some(rest) = input.strip_prefix(">=") {
            (PriceOp::Gte, rest)
        } else if let Some(rest) = input.strip_prefix("<=") {
            (PriceOp::Lte, rest)
        } else if let Some(rest) = input.strip_prefix('>') {
            (PriceOp::Gt, rest)
        } else if let Some(rest) = input.strip_prefix('<') {
            (PriceOp::Lt, rest)
        } else if let Some(rest) = input.strip_prefix('=') {
            (PriceOp::Eq, rest)
        } else {
            (PriceOp::Eq, input)
        };
        let value = rest.trim().parse::<Decimal>().ok()?;
        Some(Self { op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_fifteen_per_page() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.normalize(), (1, 15, 0));
    }

    #[test]
    fn pagination_clamps() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (3, 10, 20));
    }

    #[test]
    fn year_filter_absent_or_empty_means_all() {
        assert_eq!(parse_year_filter(None).unwrap(), None);
        assert_eq!(parse_year_filter(Some("")).unwrap(), None);
        assert_eq!(parse_year_filter(Some("  ")).unwrap(), None);
    }

    #[test]
    fn year_filter_parses_or_rejects() {
        assert_eq!(parse_year_filter(Some("2023")).unwrap(), Some(2023));
        assert!(parse_year_filter(Some("20x3")).is_err());
    }

    #[test]
    fn price_filter_operators() {
        let f = PriceFilter::parse(">= 10.50").unwrap();
        assert_eq!(f.op, PriceOp::Gte);
        assert_eq!(f.value, "10.50".parse().unwrap());

        assert_eq!(PriceFilter::parse("<5").unwrap().op, PriceOp::Lt);
        assert_eq!(PriceFilter::parse("=25").unwrap().op, PriceOp::Eq);
        assert_eq!(PriceFilter::parse("25").unwrap().op, PriceOp::Eq);
        assert_eq!(PriceFilter::parse(">=12").unwrap().op, PriceOp::Gte);
    }

    #[test]
    fn price_filter_rejects_junk() {
        assert!(PriceFilter::parse("cheap").is_none());
        assert!(PriceFilter::parse(">").is_none());
        assert!(PriceFilter::parse("").is_none());
    }
}
