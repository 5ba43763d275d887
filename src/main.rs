use daily_glow::{router, AppConfig, AppState, Storage, StoreFactory};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    info!(
        data_dir = %config.data_dir.display(),
        namespace = %config.namespace,
        "opening day stores"
    );

    tokio::fs::create_dir_all(&config.data_dir).await?;
    let factory = StoreFactory::new(Storage::dir(config.data_dir.clone()), config.namespace.clone());
    let state = AppState::open(factory).await;
    let app = router(state);

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
