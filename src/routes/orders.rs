use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithItems},
    error::AppResult,
    middleware::owner::Owner,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_order))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders placed by the owner", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_order(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let (orders, meta) = order_service::list_orders(&state, owner.as_str(), query).await?;
    Ok(Json(ApiResponse::success("Ok", orders, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key")
    ),
    responses(
        (status = 201, description = "Order created from the cart", body = ApiResponse<OrderWithItems>),
        (status = 422, description = "Cart is empty"),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    owner: Owner,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let order = order_service::checkout(&state, owner.as_str()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Checkout success", order, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key"),
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let order = order_service::get_order(&state, owner.as_str(), id).await?;
    Ok(Json(ApiResponse::success("OK", order, Some(Meta::empty()))))
}
