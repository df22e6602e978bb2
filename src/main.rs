mod config;
mod domain;
mod handlers;
mod metrics;
mod service;
mod storage;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use crate::service::{CounterService, InstrumentingMiddleware, LoggingMiddleware, StorageCounterService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    pretty_env_logger::init();
    match dotenv {
        Some(Ok(path)) => log::info!("the environment was loaded from {}", path.display()),
        Some(Err(e)) => log::warn!("no .env file was loaded: {e}"),
        None => {}
    }

    let app_config = config::AppConfig::from_env();
    log::info!("{app_config}");

    let registry = storage::Registry::with_max_connections(app_config.max_connections);
    log::debug!("available datastores: {:?}", registry.names());
    let storage = registry.select(&app_config.datastore, &app_config.extra_params).await?;
    let counter_service = StorageCounterService::new(storage);
    log::info!("the counter service is ready on top of the {} datastore", counter_service.storage_name());

    let service: handlers::SharedService = Arc::new(
        InstrumentingMiddleware::new(LoggingMiddleware::new(counter_service))
    );
    let app = metrics::init(handlers::router(service.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on port {}", app_config.port);
    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for the CTRL+C signal: {e}");
            }
            log::info!("Shutdown of the server")
        })
        .await?;

    if let Err(e) = service.terminate().await {
        log::error!("couldn't terminate the {} datastore gracefully: {e}", app_config.datastore);
    }
    Ok(())
}

/// `.env` files are only picked up by debug builds.
fn load_dotenv() -> Option<dotenvy::Result<PathBuf>> {
    cfg!(debug_assertions).then(dotenvy::dotenv)
}
