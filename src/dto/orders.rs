use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

/// One order in a customer's order list, with its recomputed total.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

/// One line of an order, joined with its product; `line_total` is
/// `quantity * unit_price` at read time.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct OrderLineDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLineDetail>,
    pub total: Decimal,
}
