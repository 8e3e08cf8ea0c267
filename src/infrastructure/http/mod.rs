pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{extract::DefaultBodyLimit, middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health::{self, HealthState},
    job::JobController,
};
use crate::infrastructure::config::Config;

/// Build the application router with all routes configured
pub fn create_router(
    health_state: Arc<HealthState>,
    job_controller: Arc<JobController>,
    max_upload_bytes: usize,
) -> Router {
    // Upload gets its own body limit, large documents exceed axum's default
    let upload_routes = Router::new()
        .route("/api/v1/upload", post(JobController::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(job_controller.clone());

    let job_routes = Router::new()
        .route("/api/v1/status/:job_id", get(JobController::get_status))
        .route("/api/v1/download/:filename", get(JobController::download))
        .with_state(job_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(upload_routes)
        .merge(job_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
