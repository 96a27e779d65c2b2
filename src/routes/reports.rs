use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    charts::{self, Series},
    dto::reports::{
        ChartReport, CustomerCategoriesReport, CustomerProductsReport, OrderYears,
        PurchaseSummaryRow, ReportTable, SalesAnalysisReport, TopBottomReport,
        YearFilteredReport,
    },
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::{RankingQuery, YearQuery},
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order-years", get(order_years))
        .route("/customers/top", get(top_customers))
        .route("/customers/{id}/orders-by-date", get(orders_by_date))
        .route("/customers/{id}/annual-orders", get(annual_orders))
        .route("/customers/{id}/products", get(customer_products))
        .route("/customers/{id}/categories", get(customer_categories))
        .route("/products/top-bottom", get(top_bottom_products))
        .route("/products/{id}/sales-series", get(product_sales_series))
        .route("/products/{id}/sales-analysis", get(product_sales_analysis))
        .route("/products/{id}/purchase-summary", get(purchase_summary))
        .route("/categories/revenues", get(category_revenues))
        .route("/categories/sales", get(category_sales))
        .route("/sales/annual", get(annual_sales))
        .route("/sales/monthly", get(monthly_sales))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopCustomersQuery {
    pub n: Option<i64>,
}

fn column<T>(rows: &[T], f: impl Fn(&T) -> Value) -> Vec<Value> {
    rows.iter().map(f).collect()
}

fn year_month_label(year: i32, month: i32) -> Value {
    json!(format!("{year}-{month:02}"))
}

#[utoipa::path(
    get,
    path = "/api/reports/order-years",
    responses(
        (status = 200, description = "Distinct years any order was placed", body = ApiResponse<OrderYears>)
    ),
    tag = "Reports"
)]
pub async fn order_years(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderYears>>> {
    let years = report_service::order_years(&state).await?;
    Ok(Json(ApiResponse::success(
        "Order years",
        OrderYears { years },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/{id}/orders-by-date",
    params(
        ("id" = Uuid, Path, description = "Customer ID"),
        ("year" = Option<String>, Query, description = "Restrict to one year"),
    ),
    responses(
        (status = 200, description = "Per-order totals for one customer"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Reports"
)]
pub async fn orders_by_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<YearFilteredReport<crate::dto::reports::OrderTotalRow>>>> {
    let selected_year = query.parsed()?;
    let order_years = report_service::order_years(&state).await?;
    let table = report_service::orders_by_date(&state, id, selected_year).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Orders by Date",
            "Order Date",
            "Order Total",
            &column(rows, |r| json!(r.order_date)),
            &[Series::new("Order Total", column(rows, |r| json!(r.total)))],
        ),
        None => charts::no_data("Orders by Date"),
    };

    Ok(Json(ApiResponse::success(
        "Orders by date",
        YearFilteredReport {
            order_years,
            selected_year,
            table,
            chart,
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/{id}/annual-orders",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer order totals grouped by year"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Reports"
)]
pub async fn annual_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ChartReport<crate::dto::reports::YearTotalRow>>>> {
    let table = report_service::annual_orders(&state, id).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Annual Orders",
            "Order Year",
            "Order Total",
            &column(rows, |r| json!(r.year)),
            &[Series::new("Order Total", column(rows, |r| json!(r.total)))],
        ),
        None => charts::no_data("Annual Orders"),
    };

    Ok(Json(ApiResponse::success(
        "Annual orders",
        ChartReport { table, chart },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/{id}/products",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer purchases grouped by product"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Reports"
)]
pub async fn customer_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomerProductsReport>>> {
    let revenues = report_service::product_revenues(&state, id).await?;
    let quantities = report_service::product_quantities(&state, id).await?;

    let revenues_chart = match revenues.rows() {
        Some(rows) => charts::bar(
            "Revenues from Products",
            "Products",
            "Revenue",
            &column(rows, |r| json!(r.product)),
            &[Series::new("Revenue", column(rows, |r| json!(r.revenue)))],
        ),
        None => charts::no_data("Revenues from Products"),
    };
    let quantities_chart = match quantities.rows() {
        Some(rows) => charts::bar(
            "Product Quantities",
            "Products",
            "Quantity",
            &column(rows, |r| json!(r.product)),
            &[Series::new("Quantity", column(rows, |r| json!(r.quantity)))],
        ),
        None => charts::no_data("Product Quantities"),
    };

    Ok(Json(ApiResponse::success(
        "Orders by product",
        CustomerProductsReport {
            revenues: ChartReport {
                table: revenues,
                chart: revenues_chart,
            },
            quantities: ChartReport {
                table: quantities,
                chart: quantities_chart,
            },
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/{id}/categories",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer purchases grouped by category"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Reports"
)]
pub async fn customer_categories(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomerCategoriesReport>>> {
    let revenues = report_service::category_revenues(&state, id).await?;
    let sales = report_service::category_sales(&state, id).await?;

    let revenues_chart = match revenues.rows() {
        Some(rows) => charts::bar(
            "Category Sales Revenues",
            "Category",
            "Sales Revenue from Category",
            &column(rows, |r| json!(r.category)),
            &[Series::new("Revenue", column(rows, |r| json!(r.revenue)))],
        ),
        None => charts::no_data("Category Sales Revenues"),
    };
    let sales_chart = match sales.rows() {
        Some(rows) => charts::bar(
            "Category Sales",
            "Category",
            "Products Bought within Category",
            &column(rows, |r| json!(r.category)),
            &[Series::new("Quantity", column(rows, |r| json!(r.quantity)))],
        ),
        None => charts::no_data("Category Sales"),
    };

    Ok(Json(ApiResponse::success(
        "Orders by category",
        CustomerCategoriesReport {
            revenues: ChartReport {
                table: revenues,
                chart: revenues_chart,
            },
            sales: ChartReport {
                table: sales,
                chart: sales_chart,
            },
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/top",
    params(("n" = Option<i64>, Query, description = "How many customers, default 10")),
    responses(
        (status = 200, description = "Customers ranked by number of orders placed")
    ),
    tag = "Reports"
)]
pub async fn top_customers(
    State(state): State<AppState>,
    Query(query): Query<TopCustomersQuery>,
) -> AppResult<Json<ApiResponse<ChartReport<crate::dto::reports::CustomerOrderCountRow>>>> {
    let n = query.n.unwrap_or(10).clamp(1, 100);
    let table = report_service::top_customers_by_order_count(&state, n).await?;

    let title = format!("Top {n} Customers by Number of Orders Placed");
    let chart = match table.rows() {
        Some(rows) => charts::bar(
            &title,
            "Customer",
            "Number of Orders",
            &column(rows, |r| json!(r.customer)),
            &[Series::new(
                "Number of Orders",
                column(rows, |r| json!(r.n_orders)),
            )],
        ),
        None => charts::no_data(&title),
    };

    Ok(Json(ApiResponse::success(
        "Top customers",
        ChartReport { table, chart },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/products/top-bottom",
    params(
        ("n" = Option<i64>, Query, description = "List size, default 10"),
        ("year" = Option<String>, Query, description = "Restrict to one year"),
    ),
    responses(
        (status = 200, description = "Top and bottom products by revenue", body = ApiResponse<TopBottomReport>)
    ),
    tag = "Reports"
)]
pub async fn top_bottom_products(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> AppResult<Json<ApiResponse<TopBottomReport>>> {
    let n = query.limit();
    let selected_year = query.parsed_year()?;
    let order_years = report_service::order_years(&state).await?;
    let (top, bottom) = report_service::top_bottom_products(&state, n, selected_year).await?;

    let year_label = selected_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "All Years".to_string());

    let top_title = format!("Top {n} Products by Revenue in {year_label}");
    let top_chart = match top.rows() {
        Some(rows) => charts::bar(
            &top_title,
            "Product",
            "Revenue",
            &column(rows, |r| json!(r.product)),
            &[Series::new("Revenue", column(rows, |r| json!(r.revenue)))],
        ),
        None => charts::no_data(&top_title),
    };

    let bottom_title = format!("Bottom {n} Products by Revenue in {year_label}");
    let bottom_chart = match bottom.rows() {
        Some(rows) => charts::bar(
            &bottom_title,
            "Product",
            "Revenue",
            &column(rows, |r| json!(r.product)),
            &[Series::new("Revenue", column(rows, |r| json!(r.revenue)))],
        ),
        None => charts::no_data(&bottom_title),
    };

    Ok(Json(ApiResponse::success(
        "Top and bottom products",
        TopBottomReport {
            order_years,
            selected_year,
            top: ChartReport {
                table: top,
                chart: top_chart,
            },
            bottom: ChartReport {
                table: bottom,
                chart: bottom_chart,
            },
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/products/{id}/sales-series",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("year" = Option<String>, Query, description = "Restrict to one year"),
    ),
    responses(
        (status = 200, description = "Product revenue and quantity by year and month"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reports"
)]
pub async fn product_sales_series(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<YearFilteredReport<crate::dto::reports::SalesSeriesRow>>>> {
    let selected_year = query.parsed()?;
    let order_years = report_service::order_years(&state).await?;
    let table = report_service::product_sales_series(&state, id, selected_year).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Product Sales",
            "Period",
            "Values",
            &column(rows, |r| year_month_label(r.year, r.month)),
            &[
                Series::new("Revenue", column(rows, |r| json!(r.revenue))),
                Series::new("Quantity", column(rows, |r| json!(r.quantity))),
            ],
        ),
        None => charts::no_data("Product Sales"),
    };

    Ok(Json(ApiResponse::success(
        "Product sales series",
        YearFilteredReport {
            order_years,
            selected_year,
            table,
            chart,
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/products/{id}/sales-analysis",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("year" = Option<String>, Query, description = "Restrict to one year"),
    ),
    responses(
        (status = 200, description = "Yearly totals with monthly breakdown and averages", body = ApiResponse<SalesAnalysisReport>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reports"
)]
pub async fn product_sales_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<SalesAnalysisReport>>> {
    let selected_year = query.parsed()?;
    let order_years = report_service::order_years(&state).await?;
    let table = report_service::product_sales_analysis(&state, id, selected_year).await?;

    let (annual_chart, monthly_chart) = match table.rows() {
        Some(years) => {
            let annual = charts::bar(
                "Annual Sales",
                "Year",
                "Values",
                &column(years, |y| json!(y.year)),
                &[
                    Series::new("Orders", column(years, |y| json!(y.orders))),
                    Series::new("Products Sold", column(years, |y| json!(y.products_sold))),
                    Series::new("Revenue", column(years, |y| json!(y.revenue))),
                ],
            );

            let mut labels = Vec::new();
            let mut revenues = Vec::new();
            for year in years {
                for month in &year.months {
                    labels.push(year_month_label(year.year, month.month));
                    revenues.push(json!(month.revenue));
                }
            }
            let monthly = charts::line(
                "Monthly Sales Comparison",
                "Month",
                "Revenue",
                &labels,
                &[Series::new("Revenue", revenues)],
            );
            (annual, monthly)
        }
        None => (
            charts::no_data("Annual Sales"),
            charts::no_data("Monthly Sales Comparison"),
        ),
    };

    Ok(Json(ApiResponse::success(
        "Product sales analysis",
        SalesAnalysisReport {
            order_years,
            selected_year,
            table,
            annual_chart,
            monthly_chart,
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/products/{id}/purchase-summary",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Who bought this product: quantity and distinct orders"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reports"
)]
pub async fn purchase_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReportTable<PurchaseSummaryRow>>>> {
    let table = report_service::customer_purchase_summary(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Purchase summary",
        table,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/categories/revenues",
    responses((status = 200, description = "Store-wide revenue by category")),
    tag = "Reports"
)]
pub async fn category_revenues(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ChartReport<crate::dto::reports::CategoryRevenueRow>>>> {
    let table = report_service::category_revenues_all(&state).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Category Sales Revenues",
            "Category",
            "Sales Revenue",
            &column(rows, |r| json!(r.category)),
            &[Series::new("Revenue", column(rows, |r| json!(r.revenue)))],
        ),
        None => charts::no_data("Category Sales Revenues"),
    };

    Ok(Json(ApiResponse::success(
        "Category revenues",
        ChartReport { table, chart },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/categories/sales",
    responses((status = 200, description = "Store-wide quantities by category")),
    tag = "Reports"
)]
pub async fn category_sales(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ChartReport<crate::dto::reports::CategoryQuantityRow>>>> {
    let table = report_service::category_sales_all(&state).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Category Sales",
            "Category",
            "Products Sold in Category",
            &column(rows, |r| json!(r.category)),
            &[Series::new("Quantity", column(rows, |r| json!(r.quantity)))],
        ),
        None => charts::no_data("Category Sales"),
    };

    Ok(Json(ApiResponse::success(
        "Category sales",
        ChartReport { table, chart },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/sales/annual",
    params(("year" = Option<String>, Query, description = "Restrict to one year")),
    responses((status = 200, description = "Store-wide sales by year")),
    tag = "Reports"
)]
pub async fn annual_sales(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<YearFilteredReport<crate::dto::reports::AnnualSalesRow>>>> {
    let selected_year = query.parsed()?;
    let order_years = report_service::order_years(&state).await?;
    let table = report_service::annual_sales_all(&state, selected_year).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Annual Sales Data",
            "Year",
            "Values",
            &column(rows, |r| json!(r.year)),
            &[
                Series::new("Revenue", column(rows, |r| json!(r.revenue))),
                Series::new("Products Sold", column(rows, |r| json!(r.products_sold))),
                Series::new("Orders", column(rows, |r| json!(r.orders))),
            ],
        ),
        None => charts::no_data("Annual Sales Data"),
    };

    Ok(Json(ApiResponse::success(
        "Annual sales",
        YearFilteredReport {
            order_years,
            selected_year,
            table,
            chart,
        },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/sales/monthly",
    params(("year" = Option<String>, Query, description = "Restrict to one year")),
    responses((status = 200, description = "Store-wide sales by month within year")),
    tag = "Reports"
)]
pub async fn monthly_sales(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ApiResponse<YearFilteredReport<crate::dto::reports::MonthlySalesRow>>>> {
    let selected_year = query.parsed()?;
    let order_years = report_service::order_years(&state).await?;
    let table = report_service::monthly_sales_all(&state, selected_year).await?;

    let chart = match table.rows() {
        Some(rows) => charts::bar(
            "Monthly Sales Data",
            "Month",
            "Values",
            &column(rows, |r| year_month_label(r.year, r.month)),
            &[
                Series::new("Revenue", column(rows, |r| json!(r.revenue))),
                Series::new("Products Sold", column(rows, |r| json!(r.products_sold))),
                Series::new("Orders", column(rows, |r| json!(r.orders))),
            ],
        ),
        None => charts::no_data("Monthly Sales Data"),
    };

    Ok(Json(ApiResponse::success(
        "Monthly sales",
        YearFilteredReport {
            order_years,
            selected_year,
            table,
            chart,
        },
        Some(Meta::empty()),
    )))
}
