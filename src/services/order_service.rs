use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::orders::{OrderLineDetail, OrderList, OrderSummary, OrderWithLines},
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    services::report_service,
    state::AppState,
};

/// A customer's orders, earliest first, each with its recomputed total.
pub async fn list_for_customer(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<OrderList>> {
    let orders = report_service::orders_for_customer(state, customer_id).await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        let total = report_service::order_total(state, order.id).await?;
        items.push(OrderSummary {
            id: order.id,
            order_date: order.order_date,
            total,
        });
    }
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

/// One order with its lines and total; every line total is recomputed from
/// the product's current price.
pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, order_date FROM orders WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let lines = sqlx::query_as::<_, OrderLineDetail>(
        r#"
        SELECT ol.id,
               ol.product_id,
               p.name AS product,
               ol.quantity,
               p.price AS unit_price,
               ol.quantity * p.price AS line_total
        FROM order_lines ol
        JOIN products p ON p.id = ol.product_id
        WHERE ol.order_id = $1
        ORDER BY p.name, ol.id
        "#,
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let total: Decimal = lines.iter().map(|line| line.line_total).sum();

    Ok(ApiResponse::success(
        "Order",
        OrderWithLines {
            order,
            lines,
            total,
        },
        Some(Meta::empty()),
    ))
}
