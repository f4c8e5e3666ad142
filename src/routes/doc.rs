use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartLine, CartView},
        orders::{OrderList, OrderWithItems},
        products::{CreateProductRequest, ProductList, SetStockRequest},
    },
    models::{CartItem, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{
        cart::{self, ReleasedLine},
        health::{self, HealthData},
        orders, params, products,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        products::list_products,
        products::create_product,
        products::get_product,
        products::set_stock,
        orders::list_order,
        orders::checkout,
        orders::get_order,
    ),
    components(
        schemas(
            Product,
            CartItem,
            Order,
            OrderItem,
            AddToCartRequest,
            CartLine,
            CartView,
            ReleasedLine,
            CreateProductRequest,
            SetStockRequest,
            ProductList,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::OrderListQuery,
            params::SortOrder,
            Meta,
            HealthData,
            ApiResponse<HealthData>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CartItem>,
            ApiResponse<ReleasedLine>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog and restocking endpoints"),
        (name = "Cart", description = "Stock reservation endpoints"),
        (name = "Orders", description = "Checkout and order history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
