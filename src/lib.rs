//! # products-api
//!
//! JSON:API 风格的产品 CRUD 服务：
//! - `app`: 产品模型、数据访问与请求处理器
//! - `core`: 错误映射、JSON:API 响应编码、请求日志中间件
//! - `infrastructure`: 数据库连接池与日志初始化
//! - `config`: 环境变量配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use app::products::handler::AppState;

/// 构建完整的路由
///
/// 请求体默认不限制大小，`AppState::body_limit` 设置时按该上限拒绝
pub fn build_router(state: AppState) -> Router {
    let body_limit = match state.body_limit {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    app::products::routes()
        .layer(body_limit)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(middleware::from_fn(
                    crate::core::middleware::request_logging_middleware,
                )),
        )
        .with_state(state)
}
