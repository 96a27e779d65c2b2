use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        categories,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel, Relation},
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{PriceFilter, PriceOp, ProductQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    let mut finder = Products::find();

    // Search fields are mutually exclusive, first one wins: name, then
    // category, then a price expression.
    let non_empty = |s: &Option<String>| s.as_ref().filter(|v| !v.is_empty()).cloned();
    if let Some(name) = non_empty(&query.name) {
        condition = condition.add(Expr::col(Column::Name).ilike(format!("%{name}%")));
    } else if let Some(category) = non_empty(&query.category) {
        finder = finder.join(JoinType::InnerJoin, Relation::Categories.def());
        condition = condition.add(
            Expr::col((categories::Entity, categories::Column::Name))
                .ilike(format!("%{category}%")),
        );
    } else if let Some(price) = non_empty(&query.price) {
        let filter = PriceFilter::parse(&price)
            .ok_or_else(|| AppError::BadRequest(format!("invalid price filter: {price}")))?;
        condition = condition.add(match filter.op {
            PriceOp::Gt => Column::Price.gt(filter.value),
            PriceOp::Gte => Column::Price.gte(filter.value),
            PriceOp::Lt => Column::Price.lt(filter.value),
            PriceOp::Lte => Column::Price.lte(filter.value),
            PriceOp::Eq => Column::Price.eq(filter.value),
        });
    }

    let finder = finder.filter(condition).order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_category(state, payload.category_id).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        category_id: Set(Some(payload.category_id)),
        unit: Set(Some(payload.unit)),
        price: Set(payload.price),
        is_available: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(state, category_id).await?;
        active.category_id = Set(Some(category_id));
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(Some(unit));
    }
    if let Some(price) = payload.price {
        // Repricing retroactively changes every reported total that involves
        // this product; totals are never snapshotted at order time.
        active.price = Set(price);
    }

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

/// Deleting a product cascades to its order lines through the FK.
pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_category(state: &AppState, id: Uuid) -> AppResult<()> {
    let found = categories::Entity::find_by_id(id).one(&state.orm).await?;
    if found.is_none() {
        return Err(AppError::BadRequest(format!("unknown category: {id}")));
    }
    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        category_id: model.category_id,
        unit: model.unit,
        price: model.price,
        is_available: model.is_available,
    }
}
