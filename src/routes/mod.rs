use axum::extract::{DefaultBodyLimit, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub mod health;
pub mod status;
pub mod tryon;

/// The `/api` surface.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(status::root))
        .route("/api/", get(status::root))
        .route(
            "/api/status",
            post(status::create_status_check).get(status::list_status_checks),
        )
        .route("/api/tryon/generate", post(tryon::generate))
        .route("/api/tryon/{id}", get(tryon::get_tryon))
        .route("/api/tryon/{id}/base64", get(tryon::get_tryon_image))
        .route("/api/tryons", get(tryon::list_tryons))
}

/// Build the full application with middleware. `/metrics` is mounted only
/// when a Prometheus recorder is installed.
pub fn app(
    state: AppState,
    max_body_bytes: usize,
    prometheus: Option<Arc<PrometheusHandle>>,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes())
        .with_state(state);

    if let Some(handle) = prometheus {
        router = router.route("/metrics", get(prometheus_metrics).with_state(handle));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
}

/// Prometheus text exposition.
async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}
