//! 日志基础设施

use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// 安装全局 fmt 订阅者，过滤表达式无效时退回 info
    pub fn init(filter: &str) {
        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
