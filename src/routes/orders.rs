use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::orders::OrderWithLines,
    error::AppResult,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

// Orders are read-only here: they are pre-populated (seed, imports); there is
// no creation or mutation path, and order_date never changes after insert.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with lines and recomputed total", body = ApiResponse<OrderWithLines>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}
