use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
    routes::params::CustomerQuery,
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    query: CustomerQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(active) = query.active {
        condition = condition.add(Column::IsActive.eq(active));
    }

    // Search fields are mutually exclusive, first one wins, as on the
    // original search form.
    let non_empty = |s: &Option<String>| s.as_ref().filter(|v| !v.is_empty()).cloned();
    if let Some(name) = non_empty(&query.name) {
        condition = condition.add(Expr::col(Column::Name).ilike(format!("%{name}%")));
    } else if let Some(country) = non_empty(&query.country) {
        condition = condition.add(Expr::col(Column::Country).ilike(format!("%{country}%")));
    } else if let Some(contact) = non_empty(&query.contact) {
        condition = condition.add(Expr::col(Column::ContactName).ilike(format!("%{contact}%")));
    } else if let Some(city) = non_empty(&query.city) {
        condition = condition.add(Expr::col(Column::City).ilike(format!("%{city}%")));
    }

    let finder = Customers::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customer_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

pub async fn get_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Customer>> {
    let customer = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(customer_from_entity);
    let customer = match customer {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Customer", customer, None))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        contact_name: Set(Some(payload.contact_name)),
        address: Set(Some(payload.address)),
        city: Set(Some(payload.city)),
        postal_code: Set(Some(payload.postal_code)),
        country: Set(Some(payload.country)),
        is_active: NotSet,
    };
    let customer = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Customer created",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let existing = Customers::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(contact_name) = payload.contact_name {
        active.contact_name = Set(Some(contact_name));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(city) = payload.city {
        active.city = Set(Some(city));
    }
    if let Some(postal_code) = payload.postal_code {
        active.postal_code = Set(Some(postal_code));
    }
    if let Some(country) = payload.country {
        active.country = Set(Some(country));
    }

    let customer = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

/// Deleting a customer does not cascade; their orders stay behind, dangling
/// by policy.
pub async fn delete_customer(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Customers::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        contact_name: model.contact_name,
        address: model.address,
        city: model.city,
        postal_code: model.postal_code,
        country: model.country,
        is_active: model.is_active,
    }
}
