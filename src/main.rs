use haul::config::AppConfig;
use haul::error::AppError;
use haul::routes::create_router;
use haul::services::storage::StorageService;
use haul::{auth::AuthService, state::AppState};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    info!(env = config.env.as_str(), app = %config.app_name, "starting");

    let storage = StorageService::new(config.seed_path.clone());
    let trips = storage.load_store().await?;
    let auth = AuthService::http(&config.auth_api_url, config.auth_timeout)?;

    let state = AppState::new(config.clone(), trips.clone(), auth);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &config.snapshot_path {
        if let Err(err) = storage.write_snapshot(&trips, path).await {
            error!("snapshot failed: {err:?}");
            return Err(err);
        }
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err:?}");
    }
    info!("shutting down");
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,haul=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
