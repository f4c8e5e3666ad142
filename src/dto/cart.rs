use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A reserved line priced at the product's current catalog price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, FromRow, FromQueryResult)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub owner_key: String,
    pub items: Vec<CartLine>,
    pub total: i64,
}
