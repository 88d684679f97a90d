use fit_tracker::{router, AppConfig, AppState, JsonStore, Tracker};
use fit_tracker::session::LocalSessionProvider;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    let store = JsonStore::open(&config.data_path).await?;
    info!(
        "using data file {} with goals {} pushups / {} pullups",
        store.path().display(),
        config.goals.pushups,
        config.goals.pullups
    );

    let tracker = Tracker::new(
        config.goals,
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(LocalSessionProvider::new(store)),
    );
    let state = AppState::new(tracker);
    let _auth_listener = state.tracker.spawn_auth_listener();

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
