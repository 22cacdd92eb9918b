//! 产品处理器

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{
    model::{Product, ProductAttributes},
    service::ProductStore,
};
use crate::core::{
    error::ApiError,
    response::{encode_many, encode_one},
};

const INVALID_CREATE_BODY: &str = "Given request body was invalid";
const INVALID_UPDATE_BODY: &str = "Given request is invalid";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    /// 生成 self 链接用的对外地址
    pub public_url: Arc<str>,
    /// 请求体大小上限，`None` 为不限制
    pub body_limit: Option<usize>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, public_url: &str) -> Self {
        Self {
            store,
            public_url: Arc::from(public_url),
            body_limit: None,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }
}

/// 路径中的产品 id；不是整数的 id 不可能存在，按未找到处理
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::NotFound(rejection.body_text()))?;

        raw.parse()
            .map(ProductId)
            .map_err(|_| ApiError::NotFound(format!("Product with id {} not found", raw)))
    }
}

/// 请求文档 `{"data": {"type"?, "attributes": {...}}}`
#[derive(Debug, Deserialize)]
struct RequestDocument {
    data: RequestResource,
}

#[derive(Debug, Deserialize)]
struct RequestResource {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    attributes: ProductAttributes,
}

/// 读取请求体失败时仍返回错误文档；超出上限为 413，其余按请求不合法处理
fn read_body(body: Result<Bytes, BytesRejection>, detail: &str) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        debug!("Failed to read request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::Validation(detail.to_string())
        }
    })
}

fn decode_attributes(body: &[u8], detail: &str) -> Result<ProductAttributes, ApiError> {
    let document: RequestDocument = serde_json::from_slice(body).map_err(|err| {
        debug!("Rejected request body: {}", err);
        ApiError::Validation(detail.to_string())
    })?;

    match document.data.kind.as_deref() {
        None | Some(Product::RESOURCE_TYPE) => Ok(document.data.attributes),
        Some(other) => {
            debug!("Rejected request body with resource type {}", other);
            Err(ApiError::Validation(detail.to_string()))
        }
    }
}

pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.store.list_all().await?;
    let resources: Vec<_> = products
        .iter()
        .map(|product| product.to_resource(&state.public_url))
        .collect();

    Ok(encode_many(resources))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = read_body(body, INVALID_CREATE_BODY)?;
    let attributes = decode_attributes(&body, INVALID_CREATE_BODY)?;
    let id = state.store.insert(&attributes).await?;
    let product = Product::new(id, attributes);

    Ok(encode_one(product.to_resource(&state.public_url)).with_status(StatusCode::CREATED))
}

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.store.get_by_id(id).await?;

    Ok(encode_one(product.to_resource(&state.public_url)))
}

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = read_body(body, INVALID_UPDATE_BODY)?;
    let attributes = decode_attributes(&body, INVALID_UPDATE_BODY)?;
    state.store.update(id, &attributes).await?;
    let product = Product::new(id, attributes);

    Ok(encode_one(product.to_resource(&state.public_url)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<StatusCode, ApiError> {
    state.store.delete_by_id(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
