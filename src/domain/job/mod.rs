pub mod model;

pub use model::{Job, JobId, JobStatus, JobUpdate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for POST /api/v1/upload
#[derive(Debug, Serialize, Deserialize)]
pub struct JobCreationResponse {
    pub job_id: JobId,
}

/// Response for GET /api/v1/status/:job_id
#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub voice: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            message: job.message,
            filename: job.result_ref,
            voice: job.voice,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
