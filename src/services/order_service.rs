use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    db::in_transaction,
    dto::{
        cart::CartLine,
        orders::{OrderList, OrderWithItems},
    },
    entity::{
        cart_items::{self, Column as CartCol, Entity as CartItems},
        carts::Entity as Carts,
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::Column as ProdCol,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::Meta,
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service::cart_total, require_owner},
    state::AppState,
};

/// Converts every reservation in the owner's cart into one order and removes the cart.
///
/// Product rows are locked in ascending id order together with the cart lines, so two
/// transactions touching overlapping products always queue in the same order. Stock is
/// left alone: it was taken when each line was reserved. On any failure nothing is
/// written and the reservations stay in place for a retry.
pub async fn checkout(state: &AppState, owner: &str) -> AppResult<OrderWithItems> {
    require_owner(owner)?;

    let _guard = state.locks.acquire(owner).await;
    tracing::debug!(owner, "checking out cart");

    let owner_key = owner.to_owned();
    let (order, items): (OrderModel, Vec<OrderItemModel>) =
        in_transaction(&state.orm, state.txn_timeout, move |txn| {
            Box::pin(async move {
                let lines = CartItems::find()
                    .select_only()
                    .column(CartCol::ProductId)
                    .column(CartCol::Quantity)
                    .column_as(ProdCol::Price, "price")
                    .join(JoinType::InnerJoin, cart_items::Relation::Products.def())
                    .filter(CartCol::OwnerKey.eq(owner_key.clone()))
                    .order_by_asc(ProdCol::Id)
                    .lock(LockType::Update)
                    .into_model::<CartLine>()
                    .all(txn)
                    .await?;

                if lines.is_empty() {
                    return Err(AppError::EmptyCart);
                }

                let total = cart_total(&lines)?;

                let order = OrderActive {
                    id: Set(Uuid::new_v4()),
                    owner_key: Set(owner_key.clone()),
                    total: Set(total),
                    created_at: NotSet,
                }
                .insert(txn)
                .await?;

                let mut items = Vec::with_capacity(lines.len());
                for line in &lines {
                    let item = OrderItemActive {
                        id: Set(Uuid::new_v4()),
                        order_id: Set(order.id),
                        product_id: Set(line.product_id),
                        quantity: Set(line.quantity),
                        price: Set(line.price),
                        created_at: NotSet,
                    }
                    .insert(txn)
                    .await?;
                    items.push(item);
                }

                CartItems::delete_many()
                    .filter(CartCol::OwnerKey.eq(owner_key.clone()))
                    .exec(txn)
                    .await?;
                Carts::delete_by_id(owner_key).exec(txn).await?;

                Ok((order, items))
            })
        })
        .await?;

    tracing::info!(owner, order_id = %order.id, total = order.total, lines = items.len(), "checkout complete");
    audit::record(
        &state.pool,
        Some(owner),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": order.total }),
    )
    .await;

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items: items.into_iter().map(order_item_from_entity).collect(),
    })
}

pub async fn list_orders(
    state: &AppState,
    owner: &str,
    query: OrderListQuery,
) -> AppResult<(OrderList, Meta)> {
    require_owner(owner)?;
    let (page, limit, offset) = query.pagination.normalize();

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(OrderCol::OwnerKey.eq(owner));
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok((OrderList { items: orders }, Meta::new(page, limit, total)))
}

pub async fn get_order(state: &AppState, owner: &str, id: Uuid) -> AppResult<OrderWithItems> {
    require_owner(owner)?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::OwnerKey.eq(owner))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound(format!("order {id}"))),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::ProductId)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
    })
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        owner_key: model.owner_key,
        total: model.total,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
