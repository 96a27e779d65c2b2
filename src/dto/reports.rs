use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Result of an aggregation: either rows, or the explicit "no data" sentinel.
///
/// Every aggregation that matches zero order lines comes back as `Empty`, and
/// every charting call site branches on it before rendering. The sentinel is
/// part of the wire format (`"status": "empty"`), so clients can branch too.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportTable<T> {
    Data { rows: Vec<T> },
    Empty,
}

impl<T> ReportTable<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            ReportTable::Empty
        } else {
            ReportTable::Data { rows }
        }
    }

    pub fn rows(&self) -> Option<&[T]> {
        match self {
            ReportTable::Data { rows } => Some(rows),
            ReportTable::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReportTable::Empty)
    }
}

/// One year of a customer's orders; the year is the extracted integer cast to
/// a text label, and rows sort ascending by that label.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct YearTotalRow {
    pub year: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct OrderTotalRow {
    pub order_id: Uuid,
    pub order_date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct ProductRevenueRow {
    pub product: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct ProductQuantityRow {
    pub product: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct CategoryRevenueRow {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct CategoryQuantityRow {
    pub category: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct SalesSeriesRow {
    pub year: i32,
    pub month: i32,
    pub revenue: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct AnnualSalesRow {
    pub year: i32,
    pub revenue: Decimal,
    pub products_sold: i64,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct MonthlySalesRow {
    pub year: i32,
    pub month: i32,
    pub revenue: Decimal,
    pub products_sold: i64,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct RankedProductRow {
    pub product_id: Uuid,
    pub product: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct CustomerOrderCountRow {
    pub customer_id: Uuid,
    pub customer: String,
    pub n_orders: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct PurchaseSummaryRow {
    pub customer: String,
    pub total_quantity: i64,
    pub total_orders: i64,
}

/// Monthly averages for one year of a product's sales, always divided by 12.
/// For partial years this understates the true monthly average; that is the
/// documented policy, kept as-is.
#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyAverages {
    pub orders: Decimal,
    pub products_sold: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyComparison {
    pub orders_vs_avg: Decimal,
    pub products_sold_vs_avg: Decimal,
    pub revenue_vs_avg: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthSales {
    pub month: i32,
    pub orders: i64,
    pub products_sold: i64,
    pub revenue: Decimal,
    pub vs_average: MonthlyComparison,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct YearSalesAnalysis {
    pub year: i32,
    pub orders: i64,
    pub products_sold: i64,
    pub revenue: Decimal,
    pub monthly_average: MonthlyAverages,
    pub months: Vec<MonthSales>,
}

/// A table paired with its rendered chart fragment (or the no-data fragment).
#[derive(Debug, Serialize, ToSchema)]
pub struct ChartReport<T> {
    pub table: ReportTable<T>,
    pub chart: String,
}

/// A chart report carrying the year-dropdown context of the original pages.
#[derive(Debug, Serialize, ToSchema)]
pub struct YearFilteredReport<T> {
    pub order_years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub table: ReportTable<T>,
    pub chart: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopBottomReport {
    pub order_years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub top: ChartReport<RankedProductRow>,
    pub bottom: ChartReport<RankedProductRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProductsReport {
    pub revenues: ChartReport<ProductRevenueRow>,
    pub quantities: ChartReport<ProductQuantityRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerCategoriesReport {
    pub revenues: ChartReport<CategoryRevenueRow>,
    pub sales: ChartReport<CategoryQuantityRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesAnalysisReport {
    pub order_years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub table: ReportTable<YearSalesAnalysis>,
    pub annual_chart: String,
    pub monthly_chart: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderYears {
    pub years: Vec<i32>,
}

/// Result of a status derivation read; the persisted flag mirrors `status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusReport {
    pub status: String,
    pub latest_order_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_collapse_to_sentinel() {
        let table = ReportTable::<YearTotalRow>::from_rows(vec![]);
        assert!(table.is_empty());
        assert!(table.rows().is_none());
    }

    #[test]
    fn sentinel_is_visible_on_the_wire() {
        let table = ReportTable::<YearTotalRow>::from_rows(vec![]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "empty" }));
    }

    #[test]
    fn data_keeps_rows() {
        let table = ReportTable::from_rows(vec![YearTotalRow {
            year: "2023".into(),
            total: Decimal::new(5500, 2),
        }]);
        assert_eq!(table.rows().unwrap().len(), 1);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["status"], "data");
        assert_eq!(json["rows"][0]["year"], "2023");
    }
}
