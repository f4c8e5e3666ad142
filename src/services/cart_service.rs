use anyhow::anyhow;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QuerySelect, Statement,
};
use uuid::Uuid;

use crate::{
    audit,
    db::in_transaction,
    dto::cart::{CartLine, CartView},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems, Model as CartItemModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::CartItem,
    services::require_owner,
    state::AppState,
};

/// Moves `quantity` units of a product from available stock into the owner's cart.
///
/// Runs under the owner's lock and a single transaction that holds the product row
/// `FOR UPDATE` from the stock check until commit. A failed reservation leaves both the
/// cart and the stock exactly as they were.
pub async fn reserve(
    state: &AppState,
    owner: &str,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<CartItem> {
    require_owner(owner)?;
    if quantity <= 0 {
        return Err(AppError::InvalidArgument(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let _guard = state.locks.acquire(owner).await;
    tracing::debug!(owner, %product_id, quantity, "reserving stock");

    let owner_key = owner.to_owned();
    let item: CartItemModel = in_transaction(&state.orm, state.txn_timeout, move |txn| {
        Box::pin(async move {
            txn.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "INSERT INTO carts (owner_key) VALUES ($1) ON CONFLICT (owner_key) DO NOTHING",
                [owner_key.clone().into()],
            ))
            .await?;

            let product = Products::find_by_id(product_id)
                .lock(LockType::Update)
                .one(txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

            if product.stock < quantity {
                return Err(AppError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available: product.stock,
                });
            }

            let item = CartItems::find()
                .from_raw_sql(Statement::from_sql_and_values(
                    DbBackend::Postgres,
                    r#"
                    INSERT INTO cart_items (owner_key, product_id, quantity)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (owner_key, product_id)
                    DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                    RETURNING owner_key, product_id, quantity, created_at
                    "#,
                    [owner_key.into(), product_id.into(), quantity.into()],
                ))
                .one(txn)
                .await?
                .ok_or_else(|| AppError::Internal(anyhow!("cart item upsert returned no row")))?;

            Products::update_many()
                .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
                .filter(ProdCol::Id.eq(product_id))
                .exec(txn)
                .await?;

            Ok(item)
        })
    })
    .await?;

    tracing::info!(owner, %product_id, quantity, reserved = item.quantity, "stock reserved");
    audit::record(
        &state.pool,
        Some(owner),
        "cart_reserve",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "quantity": quantity }),
    )
    .await;

    Ok(cart_item_from_entity(item))
}

/// Drops the owner's whole line for `product_id` and returns its quantity to stock.
///
/// Returns the quantity that was released.
pub async fn release(state: &AppState, owner: &str, product_id: Uuid) -> AppResult<i32> {
    require_owner(owner)?;

    let _guard = state.locks.acquire(owner).await;
    tracing::debug!(owner, %product_id, "releasing reservation");

    let owner_key = owner.to_owned();
    let released: i32 = in_transaction(&state.orm, state.txn_timeout, move |txn| {
        Box::pin(async move {
            let item = CartItems::find()
                .filter(CartCol::OwnerKey.eq(owner_key.clone()))
                .filter(CartCol::ProductId.eq(product_id))
                .lock(LockType::Update)
                .one(txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("cart item for product {product_id}")))?;

            CartItems::delete_many()
                .filter(CartCol::OwnerKey.eq(owner_key))
                .filter(CartCol::ProductId.eq(product_id))
                .exec(txn)
                .await?;

            Products::update_many()
                .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).add(item.quantity))
                .filter(ProdCol::Id.eq(product_id))
                .exec(txn)
                .await?;

            Ok(item.quantity)
        })
    })
    .await?;

    tracing::info!(owner, %product_id, quantity = released, "reservation released");
    audit::record(
        &state.pool,
        Some(owner),
        "cart_release",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "quantity": released }),
    )
    .await;

    Ok(released)
}

/// Current cart lines priced at today's catalog price. Read-only, takes no locks.
pub async fn list_cart(state: &AppState, owner: &str) -> AppResult<CartView> {
    require_owner(owner)?;

    let items = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT ci.product_id, ci.quantity, p.price
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.owner_key = $1
        ORDER BY ci.product_id
        "#,
    )
    .bind(owner)
    .fetch_all(&state.pool)
    .await?;

    let total = cart_total(&items)?;
    Ok(CartView {
        owner_key: owner.to_owned(),
        items,
        total,
    })
}

/// Σ quantity × price, failing instead of wrapping on overflow.
pub fn cart_total(lines: &[CartLine]) -> AppResult<i64> {
    lines.iter().try_fold(0_i64, |acc, line| {
        i64::from(line.quantity)
            .checked_mul(line.price)
            .and_then(|subtotal| acc.checked_add(subtotal))
            .ok_or_else(|| AppError::Internal(anyhow!("cart total overflows")))
    })
}

fn cart_item_from_entity(model: CartItemModel) -> CartItem {
    CartItem {
        owner_key: model.owner_key,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
