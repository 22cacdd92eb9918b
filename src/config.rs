//! 服务配置
//!
//! 配置来自环境变量（启动时会先加载工作目录下的 `.env`），
//! 未设置或为空的变量使用默认值。

use sqlx::mysql::MySqlConnectOptions;
use std::fmt;

/// 服务配置结构
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 存储后端
    pub store: StoreKind,
    /// 日志过滤表达式 (trace, debug, info, warn, error 或 EnvFilter 语法)
    pub log_filter: String,
}

/// 数据库配置
#[derive(Clone)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// 数据库名，允许为空
    pub name: String,
}

/// HTTP 服务配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// HTTP 服务端口
    pub port: u16,
    /// 绑定地址
    pub bind_address: String,
    /// 对外地址，用于生成资源的 self 链接
    pub public_url: String,
    /// 请求体大小上限（字节），`None` 表示不限制
    pub max_body_bytes: Option<usize>,
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    MySql,
    Memory,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            http: HttpConfig::default(),
            store: StoreKind::MySql,
            log_filter: "info".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: "root".to_string(),
            password: "secret".to_string(),
            host: "localhost".to_string(),
            port: 3306,
            name: String::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            public_url: "http://localhost:8000".to_string(),
            max_body_bytes: None,
        }
    }
}

// 密码不进日志
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}

impl DatabaseConfig {
    /// 构造 MySQL 连接参数
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password);

        if self.name.is_empty() {
            options
        } else {
            options.database(&self.name)
        }
    }
}

impl HttpConfig {
    /// 监听地址
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env 不存在时忽略
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值查找函数加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        let database = DatabaseConfig {
            username: get("DB_USERNAME").unwrap_or(defaults.database.username),
            password: get("DB_PASSWORD").unwrap_or(defaults.database.password),
            host: get("DB_HOST").unwrap_or(defaults.database.host),
            port: match get("DB_PORT") {
                Some(raw) => parse_port("DB_PORT", &raw)?,
                None => defaults.database.port,
            },
            name: get("DB_DATABASE").unwrap_or(defaults.database.name),
        };

        let http = HttpConfig {
            port: match get("PORT") {
                Some(raw) => parse_port("PORT", &raw)?,
                None => defaults.http.port,
            },
            bind_address: get("HOST").unwrap_or(defaults.http.bind_address),
            public_url: get("APP_URL").unwrap_or(defaults.http.public_url),
            max_body_bytes: match get("MAX_BODY_BYTES") {
                Some(raw) => Some(raw.parse().map_err(|_| {
                    ConfigError::Parse(format!("MAX_BODY_BYTES is not a valid size: `{}`", raw))
                })?),
                None => defaults.http.max_body_bytes,
            },
        };

        let store = match get("STORE").as_deref() {
            None | Some("mysql") => StoreKind::MySql,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Parse(format!(
                    "STORE must be `mysql` or `memory`, got `{}`",
                    other
                )))
            }
        };

        let config = Self {
            database,
            http,
            store,
            log_filter: get("RUST_LOG").unwrap_or(defaults.log_filter),
        };
        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP port must be greater than 0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("bind address must not be empty".to_string()));
        }
        if !(self.http.public_url.starts_with("http://")
            || self.http.public_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "public url must be an http(s) url, got `{}`",
                self.http.public_url
            )));
        }
        if self.store == StoreKind::MySql && self.database.host.is_empty() {
            return Err(ConfigError::Validation("database host must not be empty".to_string()));
        }

        Ok(())
    }
}

fn parse_port(key: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Parse(format!("{} is not a valid port: `{}`", key, raw)))
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Validation(String),
}
