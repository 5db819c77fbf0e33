pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use crate::config::{AppConfig, ConfigError, DbDialect};
pub use logic::{apply_update, validate_create, CupcakeService, ServiceError};
pub use model::*;
pub use store::{CupcakeStore, MemoryStore, PostgresStore, SqliteStore};

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, sync::Notify};

/// How long in-flight requests may run once shutdown has been requested
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect to the configured database, run migrations and serve HTTP until
/// Ctrl-C or SIGTERM. Startup failures are returned to the caller.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let dialect = config.dialect()?;

    match dialect {
        DbDialect::Sqlite => {
            let store = SqliteStore::new(&config.db_dsn, config.db_max_connections).await?;
            store.migrate().await?;
            log::info!("Connected to database {}", dialect);

            let store = Arc::new(store);
            let result = serve(Arc::clone(&store), &config).await;
            store.close().await;
            result?;
        }
        DbDialect::Postgres => {
            let store = PostgresStore::new(&config.db_dsn, config.db_max_connections).await?;
            store.migrate().await?;
            log::info!("Connected to database {}", dialect);

            let store = Arc::new(store);
            let result = serve(Arc::clone(&store), &config).await;
            store.close().await;
            result?;
        }
    }

    log::info!("Server stopped successfully");
    Ok(())
}

async fn serve<S: CupcakeStore + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let service = Arc::new(CupcakeService::new(store));
    let app = routes::create_app(service, &config.web_dir);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    log::info!("Server started on port {}", config.port);

    serve_until(listener, app, shutdown_signal(), SHUTDOWN_TIMEOUT).await
}

/// Serve `app` until `signal` resolves, then give open connections at most
/// `grace` to finish before returning.
async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let stopping = Arc::new(Notify::new());
    let notify = Arc::clone(&stopping);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notify.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => result.context("Error starting server")?,
        _ = async {
            stopping.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            log::warn!("Graceful shutdown timed out after {:?}, dropping open connections", grace);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Server shutting down...");
}
