use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::{
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        orders::OrderList,
        reports::StatusReport,
    },
    error::AppResult,
    middleware::validate::ValidatedJson,
    models::Customer,
    response::{ApiResponse, Meta},
    routes::params::CustomerQuery,
    services::{customer_service, order_service, status_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/{id}/orders", get(customer_orders))
        .route("/{id}/status", get(customer_status))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 15"),
        ("name" = Option<String>, Query, description = "Filter by name (contains)"),
        ("country" = Option<String>, Query, description = "Filter by country (contains)"),
        ("contact" = Option<String>, Query, description = "Filter by contact name (contains)"),
        ("city" = Option<String>, Query, description = "Filter by city (contains)"),
        ("active" = Option<bool>, Query, description = "Filter by activity flag"),
    ),
    responses(
        (status = 200, description = "List customers", body = ApiResponse<CustomerList>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Get customer", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::get_customer(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Create customer", body = ApiResponse<Customer>),
        (status = 422, description = "Validation failed"),
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::create_customer(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::update_customer(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Deleted customer"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = customer_service::delete_customer(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}/orders",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer orders, earliest first", body = ApiResponse<OrderList>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn customer_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_for_customer(&state, id).await?;
    Ok(Json(resp))
}

/// Reading the status persists the derived `is_active` flag as a side effect;
/// repeated reads with no new orders yield the same result.
#[utoipa::path(
    get,
    path = "/api/customers/{id}/status",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Derived activity status", body = ApiResponse<StatusReport>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn customer_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StatusReport>>> {
    let today = Utc::now().date_naive();
    let report = status_service::customer_activity(&state, id, today).await?;
    Ok(Json(ApiResponse::success(
        "Customer status",
        report,
        Some(Meta::empty()),
    )))
}
