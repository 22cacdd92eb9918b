//! 产品数据访问层
//!
//! 所有语句都是参数化的；连接从池中借出，语句结束后（包括出错时）归还。

use async_trait::async_trait;
use sqlx::{mysql::MySqlPool, FromRow};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::model::{Product, ProductAttributes};

const SELECT_ALL: &str = "SELECT id, name, price FROM products";
const SELECT_BY_ID: &str = "SELECT id, name, price FROM products WHERE id = ?";
const INSERT: &str = "INSERT INTO products (name, price) VALUES (?, ?)";
const UPDATE: &str = "UPDATE products SET name = ?, price = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM products WHERE id = ?";
const EXISTS: &str = "SELECT 1 FROM products WHERE id = ?";

/// 存储操作结果：成功返回 `Ok`，否则为未找到或底层失败
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("product {id} not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Failure(#[from] sqlx::Error),
}

/// 产品存储
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 无法解码的行会被记录并跳过
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Product, StoreError>;

    /// 返回存储分配的 id
    async fn insert(&self, attributes: &ProductAttributes) -> Result<i64, StoreError>;

    /// 返回受影响行数，没有匹配行时为 `NotFound`
    async fn update(&self, id: i64, attributes: &ProductAttributes) -> Result<u64, StoreError>;

    /// 返回受影响行数，没有匹配行时为 `NotFound`
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;
}

/// MySQL 存储
#[derive(Clone)]
pub struct MySqlProductStore {
    pool: MySqlPool,
}

impl MySqlProductStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;

        let products: Vec<Product> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| match Product::from_row(row) {
                Ok(product) => Some(product),
                Err(err) => {
                    warn!("Skipping undecodable product row {}: {}", index, err);
                    None
                }
            })
            .collect();

        Ok(products)
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn insert(&self, attributes: &ProductAttributes) -> Result<i64, StoreError> {
        let result = sqlx::query(INSERT)
            .bind(&attributes.name)
            .bind(attributes.price)
            .execute(&self.pool)
            .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|err| StoreError::Failure(sqlx::Error::Decode(Box::new(err))))?;
        info!("Created product {}", id);

        Ok(id)
    }

    async fn update(&self, id: i64, attributes: &ProductAttributes) -> Result<u64, StoreError> {
        let affected = sqlx::query(UPDATE)
            .bind(&attributes.name)
            .bind(attributes.price)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        // 未开启 found-rows 时，值未变化的匹配行不计入受影响行数
        if affected == 0 {
            let exists = sqlx::query(EXISTS)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .is_some();
            if !exists {
                return Err(StoreError::NotFound { id });
            }
        }
        info!("Updated product {}", id);

        Ok(affected)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let affected = sqlx::query(DELETE)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!("Deleted product {}", id);

        Ok(affected)
    }
}

/// 进程内存储，id 与数据库一样从 1 开始自增
#[derive(Default)]
pub struct MemoryProductStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定行初始化，后续自增 id 从最大 id 之后开始
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let rows: BTreeMap<i64, Product> = products
            .into_iter()
            .map(|product| (product.id, product))
            .collect();
        let last_id = rows.keys().next_back().copied().unwrap_or(0);

        Self {
            state: RwLock::new(MemoryState { last_id, rows }),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, StoreError> {
        self.state
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn insert(&self, attributes: &ProductAttributes) -> Result<i64, StoreError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        state.rows.insert(id, Product::new(id, attributes.clone()));
        info!("Created product {}", id);

        Ok(id)
    }

    async fn update(&self, id: i64, attributes: &ProductAttributes) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let product = state.rows.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        product.name = attributes.name.clone();
        product.price = attributes.price;
        info!("Updated product {}", id);

        Ok(1)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        state.rows.remove(&id).ok_or(StoreError::NotFound { id })?;
        info!("Deleted product {}", id);

        Ok(1)
    }
}
