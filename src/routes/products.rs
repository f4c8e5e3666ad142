use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, SetStockRequest},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product))
        .route("/{id}/stock", put(set_stock))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products ordered by id", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = product_service::list_products(&state).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::unpaged(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::get_product(&state, id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = product_service::create_product(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Product created", product, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetStockRequest,
    responses(
        (status = 200, description = "Stock overwritten", body = ApiResponse<Product>),
        (status = 400, description = "Negative stock"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStockRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::set_stock(&state, id, payload.stock).await?;
    Ok(Json(ApiResponse::success("Stock updated", product, Some(Meta::empty()))))
}
