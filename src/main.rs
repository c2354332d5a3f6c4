use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use virtual_tryon::app_state::AppState;
use virtual_tryon::config::AppConfig;
use virtual_tryon::db::{PgStore, RecordStore};
use virtual_tryon::routes;
use virtual_tryon::services::fal::FalClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing virtual-tryon server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // Register application metrics
    metrics::describe_counter!("tryon_requests_total", "Try-on requests that passed validation");
    metrics::describe_counter!("tryon_completed_total", "Try-on requests that produced an image");
    metrics::describe_counter!("tryon_failed_total", "Try-on requests whose generation failed");
    metrics::describe_histogram!(
        "tryon_generation_seconds",
        "Time spent waiting on the image generation job"
    );

    // Initialize database connection pool
    tracing::info!("Connecting to PostgreSQL database");
    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let store: Arc<dyn RecordStore> = Arc::new(store);

    // Initialize fal.ai client
    tracing::info!(model = %config.fal_model, "Initializing fal.ai client");
    let generator = FalClient::new(&config.fal_queue_url, &config.fal_model, &config.fal_key)
        .with_poll_interval(Duration::from_millis(config.fal_poll_interval_ms));

    // Create shared application state
    let state = AppState::new(store.clone(), Arc::new(generator));

    // Build API routes
    let app = routes::app(state, config.max_body_bytes, Some(Arc::new(prometheus_handle)));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Release database connections
    tracing::info!("Closing record store");
    store.close().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
