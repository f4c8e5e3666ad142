use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView},
    error::AppResult,
    middleware::owner::Owner,
    models::CartItem,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReleasedLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route("/{product_id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key")
    ),
    responses(
        (status = 200, description = "Reserved lines for the owner", body = ApiResponse<CartView>),
        (status = 400, description = "Missing owner key"),
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    owner: Owner,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::list_cart(&state, owner.as_str()).await?;
    Ok(Json(ApiResponse::success("OK", cart, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Stock reserved into the cart", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity or owner key"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    owner: Owner,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let item =
        cart_service::reserve(&state, owner.as_str(), payload.product_id, payload.quantity).await?;
    Ok(Json(ApiResponse::success("Reserved", item, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("x-owner-key" = String, Header, description = "Cart owner key"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Reservation released", body = ApiResponse<ReleasedLine>),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    owner: Owner,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReleasedLine>>> {
    let quantity = cart_service::release(&state, owner.as_str(), product_id).await?;
    Ok(Json(ApiResponse::success(
        "Removed from cart",
        ReleasedLine {
            product_id,
            quantity,
        },
        Some(Meta::empty()),
    )))
}
