//! 核心响应处理模块
//!
//! JSON:API 文档的编码：单个资源、资源集合与错误对象。

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::ApiError;

/// JSON:API 媒体类型
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// 资源对象
#[derive(Debug, Clone, Serialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub attributes: A,
    pub links: ResourceLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// 顶层文档
#[derive(Debug, Serialize)]
pub struct Document<D> {
    pub data: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub total: usize,
}

/// 错误对象，`status` 为字符串形式的状态码
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub title: String,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// 以 JSON:API 媒体类型写出的响应体
#[derive(Debug)]
pub struct JsonApi<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> JsonApi<T> {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_API_MEDIA_TYPE),
                )],
                bytes,
            )
                .into_response(),
            // 错误文档的结构固定，不会再次失败
            Err(err) => ApiError::Serialization(err).into_response(),
        }
    }
}

/// `{"data": {...}}`
pub fn encode_one<A: Serialize>(resource: Resource<A>) -> JsonApi<Document<Resource<A>>> {
    JsonApi {
        status: StatusCode::OK,
        body: Document {
            data: resource,
            meta: None,
        },
    }
}

/// `{"data": [...], "meta": {"total": N}}`
pub fn encode_many<A: Serialize>(
    resources: Vec<Resource<A>>,
) -> JsonApi<Document<Vec<Resource<A>>>> {
    let total = resources.len();
    JsonApi {
        status: StatusCode::OK,
        body: Document {
            data: resources,
            meta: Some(Meta { total }),
        },
    }
}

/// `{"errors": [{"title", "status", "detail"}]}`
pub fn encode_error(
    title: impl Into<String>,
    status: StatusCode,
    detail: impl Into<String>,
) -> JsonApi<ErrorDocument> {
    JsonApi {
        status,
        body: ErrorDocument {
            errors: vec![ErrorObject {
                title: title.into(),
                status: status.as_u16().to_string(),
                detail: detail.into(),
            }],
        },
    }
}
