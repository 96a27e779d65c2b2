use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

use traders_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive,
        customers::ActiveModel as CustomerActive,
        order_lines::ActiveModel as OrderLineActive,
        orders::ActiveModel as OrderActive,
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    error::AppError,
    routes::params::{Pagination, ProductQuery},
    services::{product_service, report_service, status_service},
    state::AppState,
};

// Integration flow over the aggregation engine and status derivation:
// seed a small catalog, then check grouped totals, sentinels, rankings,
// status write-back and retroactive repricing.
#[tokio::test]
async fn reporting_and_status_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let beverages = seed_category(&state, "Beverages").await?;
    let acme = seed_customer(&state, "Acme").await?;
    let globex = seed_customer(&state, "Globex").await?;

    let assam = seed_product(&state, "Assam Blend", beverages, "10.00").await?;
    let juniper = seed_product(&state, "Juniper Cordial", beverages, "25.00").await?;
    // Never ordered; must stay Available by default.
    let reserve = seed_product(&state, "Cellar Reserve", beverages, "40.00").await?;

    let order_a = seed_order(&state, acme, date(2023, 1, 5)).await?;
    seed_line(&state, order_a, assam, 3).await?;
    let order_b = seed_order(&state, acme, date(2023, 6, 10)).await?;
    seed_line(&state, order_b, juniper, 1).await?;
    let lineless = seed_order(&state, globex, date(2024, 2, 1)).await?;

    // Annual grouping: one row, year label "2023", total 55.00.
    let annual = report_service::annual_orders(&state, acme).await?;
    let rows = annual.rows().expect("annual orders should have data");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].year, "2023");
    assert_eq!(rows[0].total, dec("55.00"));

    // Per-order rows for the same year, earliest first.
    let by_date = report_service::orders_by_date(&state, acme, Some(2023)).await?;
    let rows = by_date.rows().expect("orders by date should have data");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].order_date, date(2023, 1, 5));
    assert_eq!(rows[0].total, dec("30.00"));
    assert_eq!(rows[1].order_date, date(2023, 6, 10));
    assert_eq!(rows[1].total, dec("25.00"));

    // The grouped sum equals the direct sum of per-order totals.
    let direct = report_service::order_total(&state, order_a).await?
        + report_service::order_total(&state, order_b).await?;
    assert_eq!(annual.rows().unwrap()[0].total, direct);

    // A lineless order totals decimal zero and still shows up per-order.
    assert_eq!(
        report_service::order_total(&state, lineless).await?,
        Decimal::ZERO
    );
    let globex_orders = report_service::orders_by_date(&state, globex, None).await?;
    assert_eq!(globex_orders.rows().unwrap()[0].total, Decimal::ZERO);

    // A year nobody ordered in yields the empty sentinel, not an error.
    assert!(
        report_service::orders_by_date(&state, acme, Some(1999))
            .await?
            .is_empty()
    );

    // Product and category groupings for the customer.
    let revenues = report_service::product_revenues(&state, acme).await?;
    let rows = revenues.rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product, "Assam Blend");
    assert_eq!(rows[0].revenue, dec("30.00"));
    let categories = report_service::category_revenues(&state, acme).await?;
    assert_eq!(categories.rows().unwrap()[0].revenue, dec("55.00"));

    // Fewer products than N: both come back, sorted each way.
    let (top, bottom) = report_service::top_bottom_products(&state, 10, None).await?;
    let top = top.rows().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].product, "Assam Blend");
    assert_eq!(top[0].revenue, dec("30.00"));
    assert_eq!(top[1].product, "Juniper Cordial");
    let bottom = bottom.rows().unwrap();
    assert_eq!(bottom[0].product, "Juniper Cordial");
    assert_eq!(bottom[1].product, "Assam Blend");

    // Customer ranking counts orders, zero-order customers included.
    let top_customers = report_service::top_customers_by_order_count(&state, 10).await?;
    let rows = top_customers.rows().unwrap();
    assert_eq!(rows[0].customer, "Acme");
    assert_eq!(rows[0].n_orders, 2);
    assert_eq!(rows[1].customer, "Globex");
    assert_eq!(rows[1].n_orders, 1);

    // Purchase summary groups by buyer with distinct order counts.
    let summary = report_service::customer_purchase_summary(&state, assam).await?;
    let rows = summary.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer, "Acme");
    assert_eq!(rows[0].total_quantity, 3);
    assert_eq!(rows[0].total_orders, 1);

    // Sales analysis: averages divide by 12 even for a one-month year.
    let analysis = report_service::product_sales_analysis(&state, assam, None).await?;
    let years = analysis.rows().unwrap();
    assert_eq!(years[0].year, 2023);
    assert_eq!(years[0].revenue, dec("30.00"));
    assert_eq!(
        years[0].monthly_average.revenue,
        dec("30.00") / Decimal::from(12)
    );
    assert_eq!(years[0].months.len(), 1);
    assert_eq!(
        years[0].months[0].vs_average.revenue_vs_avg,
        dec("30.00") - dec("30.00") / Decimal::from(12)
    );

    // Store-wide aggregation counts distinct orders and sold quantities.
    let all_sales = report_service::annual_sales_all(&state, None).await?;
    let rows = all_sales.rows().unwrap();
    assert_eq!(rows[0].year, 2023);
    assert_eq!(rows[0].revenue, dec("55.00"));
    assert_eq!(rows[0].products_sold, 4);
    assert_eq!(rows[0].orders, 2);

    // Product list price filter.
    let pricey = product_service::list_products(
        &state,
        ProductQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            name: None,
            category: None,
            price: Some(">=20".into()),
        },
    )
    .await?;
    assert_eq!(pricey.data.unwrap().items.len(), 2);

    // Status derivation: never-ordered product defaults to Available and the
    // flag is persisted.
    let today = date(2025, 8, 7);
    let availability = status_service::product_availability(&state, reserve, today).await?;
    assert_eq!(availability.status, "Available");
    assert!(availability.latest_order_date.is_none());
    let stored = Products::find_by_id(reserve)
        .one(&state.orm)
        .await?
        .expect("product still exists");
    assert!(stored.is_available);

    // Idempotent: a second read with no new orders gives the same answer.
    let second = status_service::product_availability(&state, reserve, today).await?;
    assert_eq!(second.status, availability.status);

    // Activity depends only on the injected clock.
    let active = status_service::customer_activity(&state, acme, date(2023, 12, 1)).await?;
    assert_eq!(active.status, "Active");
    assert_eq!(active.latest_order_date, Some(date(2023, 6, 10)));
    let lapsed = status_service::customer_activity(&state, acme, date(2025, 8, 7)).await?;
    assert_eq!(lapsed.status, "Inactive");

    // Nonexistent scope ids resolve to NotFound.
    let missing = report_service::annual_orders(&state, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    let missing = status_service::customer_activity(&state, Uuid::new_v4(), today).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Totals are never snapshotted: repricing a product retroactively changes
    // historical order totals.
    let product = Products::find_by_id(juniper)
        .one(&state.orm)
        .await?
        .expect("product still exists");
    let mut repriced: ProductActive = product.into();
    repriced.price = Set(dec("30.00"));
    repriced.update(&state.orm).await?;
    assert_eq!(
        report_service::order_total(&state, order_b).await?,
        dec("30.00")
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_lines, orders, products, customers, categories RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

async fn seed_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        description: Set(Some(String::new())),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

async fn seed_customer(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        contact_name: Set(Some("Jo Doe".into())),
        address: Set(Some("1 Main St".into())),
        city: Set(Some("Lyon".into())),
        postal_code: Set(Some("69001".into())),
        country: Set(Some("France".into())),
        is_active: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(customer.id)
}

async fn seed_product(
    state: &AppState,
    name: &str,
    category_id: Uuid,
    price: &str,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        category_id: Set(Some(category_id)),
        unit: Set(Some("1 unit".into())),
        price: Set(price.parse()?),
        is_available: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

async fn seed_order(
    state: &AppState,
    customer_id: Uuid,
    order_date: NaiveDate,
) -> anyhow::Result<Uuid> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(Some(customer_id)),
        order_date: Set(order_date),
    }
    .insert(&state.orm)
    .await?;
    Ok(order.id)
}

async fn seed_line(
    state: &AppState,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    OrderLineActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}
