//! 数据库基础设施

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Error;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// 进程级数据库连接池，启动时创建，关闭服务后释放
pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!(
            "Connecting to database {}:{}/{}",
            config.host, config.port, config.name
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(8))
            .connect_with(config.connect_options())
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
