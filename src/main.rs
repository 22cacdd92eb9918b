use products_api::{
    app::products::service::{MemoryProductStore, MySqlProductStore, ProductStore},
    build_router,
    config::{AppConfig, StoreKind},
    infrastructure::{database::DatabaseManager, logger::Logger},
    AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    Logger::init(&config.log_filter);

    info!(?config, "Starting products API");

    // 存储在启动时创建一次，注入到路由状态中
    let (store, database): (Arc<dyn ProductStore>, Option<DatabaseManager>) = match config.store {
        StoreKind::MySql => {
            let database = DatabaseManager::new(&config.database).await?;
            let store: Arc<dyn ProductStore> =
                Arc::new(MySqlProductStore::new(database.get_pool().clone()));
            (store, Some(database))
        }
        StoreKind::Memory => {
            warn!("Using in-memory store, data will be lost on shutdown");
            let store: Arc<dyn ProductStore> = Arc::new(MemoryProductStore::new());
            (store, None)
        }
    };

    let mut state = AppState::new(store, &config.http.public_url);
    if let Some(limit) = config.http.max_body_bytes {
        state = state.with_body_limit(limit);
    }
    let app = build_router(state);

    let listener = TcpListener::bind(config.http.socket_addr()).await?;
    info!("Products API listening on http://{}", listener.local_addr()?);
    info!("   GET    /api/products");
    info!("   POST   /api/products");
    info!("   GET    /api/products/:id");
    info!("   PATCH  /api/products/:id");
    info!("   DELETE /api/products/:id");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    info!("Products API stopped");

    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
