use axum::extract::DefaultBodyLimit;
use jobboard_backend::{
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    middleware::cors::api_cors,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.json_logs);

    let pool = create_pool().await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool, &config.jwt_secret);
    let dispatcher = app_state.dispatcher.clone();

    let app = routes::build_router(app_state, config.api_rps)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let queued notifications land before exiting.
    dispatcher.flush().await;
    info!("Server stopped");

    Ok(())
}
