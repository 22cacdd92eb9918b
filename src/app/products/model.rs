//! 产品数据模型

use serde::{Deserialize, Serialize};

use crate::core::response::{Resource, ResourceLinks};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    /// 由存储分配，创建前为 0
    pub id: i64,
    pub name: String,
    pub price: i64,
}

/// 对外公开的属性集合，同时也是创建/更新请求的载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub name: String,
    pub price: i64,
}

impl Product {
    pub const RESOURCE_TYPE: &'static str = "products";

    pub fn new(id: i64, attributes: ProductAttributes) -> Self {
        Self {
            id,
            name: attributes.name,
            price: attributes.price,
        }
    }

    pub fn attributes(&self) -> ProductAttributes {
        ProductAttributes {
            name: self.name.clone(),
            price: self.price,
        }
    }

    pub fn to_resource(&self, base_url: &str) -> Resource<ProductAttributes> {
        Resource {
            kind: Self::RESOURCE_TYPE,
            id: self.id.to_string(),
            attributes: self.attributes(),
            links: ResourceLinks {
                self_link: self_link(base_url, self.id),
            },
        }
    }
}

/// `{base}/api/products/{id}`
pub fn self_link(base_url: &str, id: i64) -> String {
    format!("{}/api/products/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_link() {
        assert_eq!(
            self_link("http://localhost:8000", 7),
            "http://localhost:8000/api/products/7"
        );
        assert_eq!(
            self_link("https://shop.example.com/", 42),
            "https://shop.example.com/api/products/42"
        );
    }

    #[test]
    fn test_to_resource() {
        let product = Product {
            id: 3,
            name: "Lamp".to_string(),
            price: 1500,
        };

        let resource = product.to_resource("http://localhost:8000");
        assert_eq!(resource.kind, "products");
        assert_eq!(resource.id, "3");
        assert_eq!(resource.attributes.name, "Lamp");
        assert_eq!(resource.attributes.price, 1500);
        assert_eq!(resource.links.self_link, "http://localhost:8000/api/products/3");
    }

    #[test]
    fn test_attributes_require_name_and_price() {
        let parsed: Result<ProductAttributes, _> = serde_json::from_str(r#"{"name":"Lamp"}"#);
        assert!(parsed.is_err());

        let parsed: Result<ProductAttributes, _> =
            serde_json::from_str(r#"{"name":"Lamp","price":"10"}"#);
        assert!(parsed.is_err());
    }
}
