//! Server: loads config from env, prepares the customers table, serves the API.

use customer_service::{
    app, config::DatabaseConfig, ensure_customer_table, ensure_database_exists, AppState, Config,
    MemoryCustomerStore, PgCustomerStore,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("customer_service=info,tower_http=info")),
        )
        .init();

    let state = connect_store(&config.database).await?;
    let router = app(state, &config.cors)?;

    let listener = TcpListener::bind(config.server.addr()).await?;
    tracing::info!(
        origins = ?config.cors.allowed_origins,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn connect_store(db: &DatabaseConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    if db.is_memory() {
        tracing::warn!("DATABASE_URL=memory: records are kept in process and lost on exit");
        return Ok(AppState::new(MemoryCustomerStore::new()));
    }

    ensure_database_exists(&db.url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(db.pool_size.min(db.max_connections()))
        .max_connections(db.max_connections())
        .acquire_timeout(db.acquire_timeout)
        .test_before_acquire(true)
        .connect(&db.url)
        .await?;
    ensure_customer_table(&pool).await?;
    tracing::info!(max_connections = db.max_connections(), "connected to database");
    Ok(AppState::new(PgCustomerStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
