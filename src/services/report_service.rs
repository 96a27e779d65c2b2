//! The aggregation engine: grouped read queries over order-line facts.
//!
//! Everything here is a deterministic read on the sqlx pool. Line totals are
//! always `quantity * products.price` at read time, so a price change
//! retroactively reprices historical orders; nothing is snapshotted. All
//! monetary results are `Decimal`.

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::reports::{
        AnnualSalesRow, CategoryQuantityRow, CategoryRevenueRow, CustomerOrderCountRow,
        MonthSales, MonthlyAverages, MonthlyComparison, MonthlySalesRow, OrderTotalRow,
        ProductQuantityRow, ProductRevenueRow, PurchaseSummaryRow, RankedProductRow,
        ReportTable, SalesSeriesRow, YearSalesAnalysis, YearTotalRow,
    },
    error::{AppError, AppResult},
    models::Order,
    state::AppState,
};

pub async fn ensure_customer(state: &AppState, id: Uuid) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    if exists { Ok(()) } else { Err(AppError::NotFound) }
}

pub async fn ensure_product(state: &AppState, id: Uuid) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    if exists { Ok(()) } else { Err(AppError::NotFound) }
}

pub async fn ensure_order(state: &AppState, id: Uuid) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    if exists { Ok(()) } else { Err(AppError::NotFound) }
}

/// Distinct years any order was placed, ascending. Fills the year dropdowns.
pub async fn order_years(state: &AppState) -> AppResult<Vec<i32>> {
    let years = sqlx::query_scalar::<_, i32>(
        "SELECT DISTINCT EXTRACT(YEAR FROM order_date)::int AS year FROM orders ORDER BY year",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(years)
}

/// A customer's orders, earliest first.
pub async fn orders_for_customer(state: &AppState, customer_id: Uuid) -> AppResult<Vec<Order>> {
    ensure_customer(state, customer_id).await?;
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, order_date FROM orders WHERE customer_id = $1 ORDER BY order_date, id",
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(orders)
}

/// Sum of `quantity * price` over one order's lines; decimal zero when the
/// order has no lines.
pub async fn order_total(state: &AppState, order_id: Uuid) -> AppResult<Decimal> {
    ensure_order(state, order_id).await?;
    let total: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(ol.quantity * p.price), 0) AS total
        FROM order_lines ol
        JOIN products p ON p.id = ol.product_id
        WHERE ol.order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_one(&state.pool)
    .await?;
    Ok(total)
}

/// A customer's order totals grouped by calendar year, one row per year with
/// at least one order. The year comes out as a text label and rows sort by it.
pub async fn annual_orders(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ReportTable<YearTotalRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, YearTotalRow>(
        r#"
        SELECT EXTRACT(YEAR FROM o.order_date)::int::text AS year,
               COALESCE(SUM(ol.quantity * p.price), 0) AS total
        FROM orders o
        LEFT JOIN order_lines ol ON ol.order_id = o.id
        LEFT JOIN products p ON p.id = ol.product_id
        WHERE o.customer_id = $1
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Per-order totals for one customer, optionally restricted to a year.
pub async fn orders_by_date(
    state: &AppState,
    customer_id: Uuid,
    year: Option<i32>,
) -> AppResult<ReportTable<OrderTotalRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, OrderTotalRow>(
        r#"
        SELECT o.id AS order_id,
               o.order_date,
               COALESCE(SUM(ol.quantity * p.price), 0) AS total
        FROM orders o
        LEFT JOIN order_lines ol ON ol.order_id = o.id
        LEFT JOIN products p ON p.id = ol.product_id
        WHERE o.customer_id = $1
          AND ($2::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $2)
        GROUP BY o.id, o.order_date
        ORDER BY o.order_date, o.id
        "#,
    )
    .bind(customer_id)
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// A customer's lines grouped by product name (name ties merge), revenue sum.
pub async fn product_revenues(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ReportTable<ProductRevenueRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, ProductRevenueRow>(
        r#"
        SELECT p.name AS product, SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE o.customer_id = $1
        GROUP BY p.name
        ORDER BY p.name
        "#,
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Same grouping as [`product_revenues`], quantity sum.
pub async fn product_quantities(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ReportTable<ProductQuantityRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, ProductQuantityRow>(
        r#"
        SELECT p.name AS product, SUM(ol.quantity)::bigint AS quantity
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE o.customer_id = $1
        GROUP BY p.name
        ORDER BY p.name
        "#,
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// A customer's lines grouped by the product's category name, revenue sum.
pub async fn category_revenues(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ReportTable<CategoryRevenueRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, CategoryRevenueRow>(
        r#"
        SELECT c.name AS category, SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        JOIN categories c ON c.id = p.category_id
        WHERE o.customer_id = $1
        GROUP BY c.name
        ORDER BY c.name
        "#,
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Same grouping as [`category_revenues`], quantity sum.
pub async fn category_sales(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ReportTable<CategoryQuantityRow>> {
    ensure_customer(state, customer_id).await?;
    let rows = sqlx::query_as::<_, CategoryQuantityRow>(
        r#"
        SELECT c.name AS category, SUM(ol.quantity)::bigint AS quantity
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        JOIN categories c ON c.id = p.category_id
        WHERE o.customer_id = $1
        GROUP BY c.name
        ORDER BY c.name
        "#,
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Store-wide category revenue grouping (per-product analysis page).
pub async fn category_revenues_all(state: &AppState) -> AppResult<ReportTable<CategoryRevenueRow>> {
    let rows = sqlx::query_as::<_, CategoryRevenueRow>(
        r#"
        SELECT c.name AS category, SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN products p ON p.id = ol.product_id
        JOIN categories c ON c.id = p.category_id
        GROUP BY c.name
        ORDER BY c.name
        "#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Store-wide category quantity grouping.
pub async fn category_sales_all(state: &AppState) -> AppResult<ReportTable<CategoryQuantityRow>> {
    let rows = sqlx::query_as::<_, CategoryQuantityRow>(
        r#"
        SELECT c.name AS category, SUM(ol.quantity)::bigint AS quantity
        FROM order_lines ol
        JOIN products p ON p.id = ol.product_id
        JOIN categories c ON c.id = p.category_id
        GROUP BY c.name
        ORDER BY c.name
        "#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// One product's lines grouped by (year, month), revenue and quantity sums.
pub async fn product_sales_series(
    state: &AppState,
    product_id: Uuid,
    year: Option<i32>,
) -> AppResult<ReportTable<SalesSeriesRow>> {
    ensure_product(state, product_id).await?;
    let rows = sqlx::query_as::<_, SalesSeriesRow>(
        r#"
        SELECT EXTRACT(YEAR FROM o.order_date)::int AS year,
               EXTRACT(MONTH FROM o.order_date)::int AS month,
               SUM(ol.quantity * p.price) AS revenue,
               SUM(ol.quantity)::bigint AS quantity
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ol.product_id = $1
          AND ($2::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $2)
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(product_id)
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Store-wide sales grouped by year: revenue, products sold, distinct orders.
pub async fn annual_sales_all(
    state: &AppState,
    year: Option<i32>,
) -> AppResult<ReportTable<AnnualSalesRow>> {
    let rows = sqlx::query_as::<_, AnnualSalesRow>(
        r#"
        SELECT EXTRACT(YEAR FROM o.order_date)::int AS year,
               SUM(ol.quantity * p.price) AS revenue,
               SUM(ol.quantity)::bigint AS products_sold,
               COUNT(DISTINCT o.id) AS orders
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $1)
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Store-wide sales grouped by month within year.
pub async fn monthly_sales_all(
    state: &AppState,
    year: Option<i32>,
) -> AppResult<ReportTable<MonthlySalesRow>> {
    let rows = sqlx::query_as::<_, MonthlySalesRow>(
        r#"
        SELECT EXTRACT(YEAR FROM o.order_date)::int AS year,
               EXTRACT(MONTH FROM o.order_date)::int AS month,
               SUM(ol.quantity * p.price) AS revenue,
               SUM(ol.quantity)::bigint AS products_sold,
               COUNT(DISTINCT o.id) AS orders
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $1)
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// Rank products with at least one line by total revenue. Ties order by
/// product name then id, so equal revenues always come out the same way.
pub async fn top_bottom_products(
    state: &AppState,
    n: i64,
    year: Option<i32>,
) -> AppResult<(ReportTable<RankedProductRow>, ReportTable<RankedProductRow>)> {
    let top = sqlx::query_as::<_, RankedProductRow>(
        r#"
        SELECT p.id AS product_id, p.name AS product, SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $1)
        GROUP BY p.id, p.name
        ORDER BY revenue DESC, p.name ASC, p.id ASC
        LIMIT $2
        "#,
    )
    .bind(year)
    .bind(n)
    .fetch_all(&state.pool)
    .await?;

    let bottom = sqlx::query_as::<_, RankedProductRow>(
        r#"
        SELECT p.id AS product_id, p.name AS product, SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $1)
        GROUP BY p.id, p.name
        ORDER BY revenue ASC, p.name ASC, p.id ASC
        LIMIT $2
        "#,
    )
    .bind(year)
    .bind(n)
    .fetch_all(&state.pool)
    .await?;

    Ok((ReportTable::from_rows(top), ReportTable::from_rows(bottom)))
}

/// Customers ranked by number of orders placed, descending. Customers with no
/// orders count zero rather than dropping out.
pub async fn top_customers_by_order_count(
    state: &AppState,
    n: i64,
) -> AppResult<ReportTable<CustomerOrderCountRow>> {
    let rows = sqlx::query_as::<_, CustomerOrderCountRow>(
        r#"
        SELECT c.id AS customer_id, c.name AS customer, COUNT(o.id) AS n_orders
        FROM customers c
        LEFT JOIN orders o ON o.customer_id = c.id
        GROUP BY c.id, c.name
        ORDER BY n_orders DESC, c.name ASC, c.id ASC
        LIMIT $1
        "#,
    )
    .bind(n)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

/// One product's lines grouped by purchasing customer: quantity and distinct
/// order count.
pub async fn customer_purchase_summary(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ReportTable<PurchaseSummaryRow>> {
    ensure_product(state, product_id).await?;
    let rows = sqlx::query_as::<_, PurchaseSummaryRow>(
        r#"
        SELECT c.name AS customer,
               SUM(ol.quantity)::bigint AS total_quantity,
               COUNT(DISTINCT o.id) AS total_orders
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN customers c ON c.id = o.customer_id
        WHERE ol.product_id = $1
        GROUP BY c.name
        ORDER BY c.name
        "#,
    )
    .bind(product_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(rows))
}

#[derive(Debug, FromRow)]
struct PeriodRow {
    year: i32,
    month: i32,
    orders: i64,
    products_sold: i64,
    revenue: Decimal,
}

/// Per-year sales analysis for one product: totals, monthly breakdown, and
/// monthly averages with per-month deltas.
pub async fn product_sales_analysis(
    state: &AppState,
    product_id: Uuid,
    year: Option<i32>,
) -> AppResult<ReportTable<YearSalesAnalysis>> {
    ensure_product(state, product_id).await?;
    let rows = sqlx::query_as::<_, PeriodRow>(
        r#"
        SELECT EXTRACT(YEAR FROM o.order_date)::int AS year,
               EXTRACT(MONTH FROM o.order_date)::int AS month,
               COUNT(DISTINCT o.id) AS orders,
               SUM(ol.quantity)::bigint AS products_sold,
               SUM(ol.quantity * p.price) AS revenue
        FROM order_lines ol
        JOIN orders o ON o.id = ol.order_id
        JOIN products p ON p.id = ol.product_id
        WHERE ol.product_id = $1
          AND ($2::int IS NULL OR EXTRACT(YEAR FROM o.order_date)::int = $2)
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(product_id)
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(ReportTable::from_rows(assemble_years(rows)))
}

// Rows arrive sorted by (year, month); fold them into per-year analyses.
// Averages divide by 12 even for partial years -- documented policy.
fn assemble_years(rows: Vec<PeriodRow>) -> Vec<YearSalesAnalysis> {
    let twelve = Decimal::from(12);
    let mut years: Vec<YearSalesAnalysis> = Vec::new();

    for row in rows {
        if years.last().map(|y| y.year) != Some(row.year) {
            years.push(YearSalesAnalysis {
                year: row.year,
                orders: 0,
                products_sold: 0,
                revenue: Decimal::ZERO,
                monthly_average: MonthlyAverages {
                    orders: Decimal::ZERO,
                    products_sold: Decimal::ZERO,
                    revenue: Decimal::ZERO,
                },
                months: Vec::new(),
            });
        }
        let current = years.last_mut().expect("year entry just pushed");
        current.orders += row.orders;
        current.products_sold += row.products_sold;
        current.revenue += row.revenue;
        current.months.push(MonthSales {
            month: row.month,
            orders: row.orders,
            products_sold: row.products_sold,
            revenue: row.revenue,
            vs_average: MonthlyComparison {
                orders_vs_avg: Decimal::ZERO,
                products_sold_vs_avg: Decimal::ZERO,
                revenue_vs_avg: Decimal::ZERO,
            },
        });
    }

    for year in &mut years {
        year.monthly_average = MonthlyAverages {
            orders: Decimal::from(year.orders) / twelve,
            products_sold: Decimal::from(year.products_sold) / twelve,
            revenue: year.revenue / twelve,
        };
        for month in &mut year.months {
            month.vs_average = MonthlyComparison {
                orders_vs_avg: Decimal::from(month.orders) - year.monthly_average.orders,
                products_sold_vs_avg: Decimal::from(month.products_sold)
                    - year.monthly_average.products_sold,
                revenue_vs_avg: month.revenue - year.monthly_average.revenue,
            };
        }
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: i32, orders: i64, products_sold: i64, revenue: &str) -> PeriodRow {
        PeriodRow {
            year,
            month,
            orders,
            products_sold,
            revenue: revenue.parse().unwrap(),
        }
    }

    #[test]
    fn assemble_groups_by_year_in_order() {
        let years = assemble_years(vec![
            row(2023, 1, 1, 3, "30.00"),
            row(2023, 6, 1, 1, "25.00"),
            row(2024, 2, 2, 4, "40.00"),
        ]);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2023);
        assert_eq!(years[0].orders, 2);
        assert_eq!(years[0].products_sold, 4);
        assert_eq!(years[0].revenue, "55.00".parse().unwrap());
        assert_eq!(years[0].months.len(), 2);
        assert_eq!(years[1].year, 2024);
        assert_eq!(years[1].months.len(), 1);
    }

    #[test]
    fn averages_always_divide_by_twelve() {
        // Two months of data still average over 12 months.
        let years = assemble_years(vec![
            row(2023, 1, 1, 3, "30.00"),
            row(2023, 6, 1, 1, "25.00"),
        ]);
        let avg = &years[0].monthly_average;
        assert_eq!(avg.revenue, "55.00".parse::<Decimal>().unwrap() / Decimal::from(12));
        assert_eq!(avg.orders, Decimal::from(2) / Decimal::from(12));
    }

    #[test]
    fn month_deltas_compare_against_the_average() {
        let years = assemble_years(vec![
            row(2023, 1, 1, 3, "30.00"),
            row(2023, 6, 1, 1, "25.00"),
        ]);
        let january = &years[0].months[0];
        let avg_revenue = years[0].monthly_average.revenue;
        assert_eq!(
            january.vs_average.revenue_vs_avg,
            "30.00".parse::<Decimal>().unwrap() - avg_revenue
        );
    }

    #[test]
    fn no_rows_means_no_years() {
        assert!(assemble_years(Vec::new()).is_empty());
    }
}
