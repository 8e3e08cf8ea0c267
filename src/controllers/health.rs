use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::pipeline::PipelineService;
use crate::infrastructure::repositories::JobRepository;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// State for the readiness check
pub struct HealthState {
    pub job_repo: Arc<JobRepository>,
    pub pipeline_service: Arc<PipelineService>,
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let jobs = state.job_repo.len().await;

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": state.pipeline_service.provider(),
            "jobs": jobs
        })),
    )
}
