//! Status derivation: recency of activity -> persisted boolean flag.
//!
//! The classification itself is pure (`crate::status`); this service fetches
//! the inputs, then persists the derived flag as an explicit, visible update
//! rather than a hidden side effect of the read. Concurrent checks for the
//! same entity race on the write, but both compute the same value from the
//! same orders, so last-writer-wins is benign.

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::reports::StatusReport,
    entity::{customers, products},
    error::{AppError, AppResult},
    state::AppState,
    status,
};

async fn latest_customer_order_date(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<Option<NaiveDate>> {
    let latest: Option<NaiveDate> =
        sqlx::query_scalar("SELECT MAX(order_date) FROM orders WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&state.pool)
            .await?;
    Ok(latest)
}

async fn latest_product_order_date(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<Option<NaiveDate>> {
    let latest: Option<NaiveDate> = sqlx::query_scalar(
        r#"
        SELECT MAX(o.order_date)
        FROM orders o
        JOIN order_lines ol ON ol.order_id = o.id
        WHERE ol.product_id = $1
        "#,
    )
    .bind(product_id)
    .fetch_one(&state.pool)
    .await?;
    Ok(latest)
}

/// Derive and persist a customer's `is_active` flag; returns the label and
/// the latest order date the decision was based on.
pub async fn customer_activity(
    state: &AppState,
    id: Uuid,
    today: NaiveDate,
) -> AppResult<StatusReport> {
    let customer = customers::Entity::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let latest = latest_customer_order_date(state, id).await?;
    let recency = status::classify(latest, today);

    let mut active: customers::ActiveModel = customer.into();
    active.is_active = Set(recency.as_flag());
    active.update(&state.orm).await?;

    Ok(StatusReport {
        status: recency.activity_label().to_string(),
        latest_order_date: latest,
    })
}

/// Derive and persist a product's `is_available` flag.
pub async fn product_availability(
    state: &AppState,
    id: Uuid,
    today: NaiveDate,
) -> AppResult<StatusReport> {
    let product = products::Entity::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let latest = latest_product_order_date(state, id).await?;
    let recency = status::classify(latest, today);

    let mut available: products::ActiveModel = product.into();
    available.is_available = Set(recency.as_flag());
    available.update(&state.orm).await?;

    Ok(StatusReport {
        status: recency.availability_label().to_string(),
        latest_order_date: latest,
    })
}
