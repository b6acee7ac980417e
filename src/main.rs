use dotenvy::dotenv;
use staybook::logging::init_tracing;
use staybook::metrics::init_metrics;
use staybook::router::init_router;
use staybook::state::init_app_state;
use staybook_config::ServerConfig;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let metrics_handle = match init_metrics() {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder, continuing without metrics");
            None
        }
    };

    let state = init_app_state(metrics_handle).await;
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, address = %address, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!("🚀 Server running on http://{}", address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
