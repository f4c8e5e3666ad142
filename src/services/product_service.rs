use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::CreateProductRequest,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    state::AppState,
};

pub async fn create_product(state: &AppState, payload: CreateProductRequest) -> AppResult<Product> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidArgument("name is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::InvalidArgument("price must be >= 0".into()));
    }
    let stock = payload.stock.unwrap_or(0);
    if stock < 0 {
        return Err(AppError::InvalidArgument("stock must be >= 0".into()));
    }

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(stock),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, stock = product.stock, "product created");
    audit::record(
        &state.pool,
        None,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product_from_entity(product))
}

/// Every product, ordered by id.
pub async fn list_products(state: &AppState) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Overwrites available stock for restocking.
///
/// This is an absolute set: quantities already reserved in carts are not reconciled.
pub async fn set_stock(state: &AppState, id: Uuid, new_stock: i32) -> AppResult<Product> {
    if new_stock < 0 {
        return Err(AppError::InvalidArgument("stock cannot be negative".into()));
    }

    let result = Products::update_many()
        .col_expr(Column::Stock, Expr::value(new_stock))
        .filter(Column::Id.eq(id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    tracing::info!(product_id = %id, stock = new_stock, "stock set");
    audit::record(
        &state.pool,
        None,
        "stock_set",
        "products",
        serde_json::json!({ "product_id": id, "stock": new_stock }),
    )
    .await;

    get_product(state, id).await
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
