use chrono::NaiveDate;
use rust_decimal::Decimal;
use traders_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url, 5).await?;

    let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM customers")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        println!("Catalog already seeded, nothing to do");
        return Ok(());
    }

    let beverages = insert_category(&pool, "Beverages", "Soft drinks, coffees, teas, beers").await?;
    let condiments = insert_category(&pool, "Condiments", "Sweet and savory sauces, relishes").await?;
    let seafood = insert_category(&pool, "Seafood", "Seaweed and fish").await?;

    let around_the_horn =
        insert_customer(&pool, "Around the Horn", "Thomas Hardy", "London", "United Kingdom").await?;
    let bon_app = insert_customer(&pool, "Bon app", "Laurence Lebihan", "Marseille", "France").await?;
    let folk_och_fa =
        insert_customer(&pool, "Folk och fa HB", "Maria Larsson", "Bracke", "Sweden").await?;

    let chai = insert_product(&pool, "Chai", beverages, "10 boxes x 20 bags", "18.00").await?;
    let chang = insert_product(&pool, "Chang", beverages, "24 - 12 oz bottles", "19.00").await?;
    let syrup = insert_product(&pool, "Aniseed Syrup", condiments, "12 - 550 ml bottles", "10.00").await?;
    let ikura = insert_product(&pool, "Ikura", seafood, "12 - 200 ml jars", "31.00").await?;
    let crab = insert_product(&pool, "Boston Crab Meat", seafood, "24 - 4 oz tins", "18.40").await?;
    // Never ordered below; stays Available by default.
    insert_product(&pool, "Outback Lager", beverages, "24 - 355 ml bottles", "15.00").await?;

    let orders = [
        (around_the_horn, "2023-01-14", vec![(chai, 10), (syrup, 4)]),
        (around_the_horn, "2023-08-02", vec![(ikura, 2)]),
        (around_the_horn, "2024-03-21", vec![(chang, 12), (crab, 6)]),
        (bon_app, "2023-05-09", vec![(syrup, 8), (chai, 3)]),
        (bon_app, "2024-11-17", vec![(ikura, 5)]),
        (folk_och_fa, "2025-02-25", vec![(crab, 10), (chang, 2)]),
    ];

    for (customer_id, date, lines) in orders {
        let order_id = insert_order(&pool, customer_id, date.parse::<NaiveDate>()?).await?;
        for (product_id, quantity) in lines {
            insert_order_line(&pool, order_id, product_id, quantity).await?;
        }
    }

    println!("Seeded trader catalog with sample orders");
    Ok(())
}

async fn insert_category(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(id)
}

async fn insert_customer(
    pool: &sqlx::PgPool,
    name: &str,
    contact: &str,
    city: &str,
    country: &str,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO customers (id, name, contact_name, address, city, postal_code, country)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(contact)
    .bind("1 Market Street")
    .bind(city)
    .bind("10115")
    .bind(country)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn insert_product(
    pool: &sqlx::PgPool,
    name: &str,
    category_id: Uuid,
    unit: &str,
    price: &str,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO products (id, name, category_id, unit, price) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(name)
    .bind(category_id)
    .bind(unit)
    .bind(price.parse::<Decimal>()?)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn insert_order(
    pool: &sqlx::PgPool,
    customer_id: Uuid,
    order_date: NaiveDate,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO orders (id, customer_id, order_date) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(customer_id)
        .bind(order_date)
        .execute(pool)
        .await?;
    Ok(id)
}

async fn insert_order_line(
    pool: &sqlx::PgPool,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO order_lines (id, order_id, product_id, quantity) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}
