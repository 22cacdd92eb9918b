//! 产品资源：`/api/products`

pub mod handler;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

use handler::{
    create_product, delete_product, get_product, list_products, update_product, AppState,
};

/// 产品路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route(
            "/api/products/:id/",
            get(get_product).patch(update_product).delete(delete_product),
        )
}
