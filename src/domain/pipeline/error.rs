use crate::domain::document::ExtractionError;
use crate::domain::job::JobId;
use crate::error::AppError;
use crate::infrastructure::repositories::JobStoreError;
use crate::infrastructure::storage::AssemblyError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("No text chunks found in document, nothing to synthesize")]
    NoChunks,
    #[error("No audio chunks were successfully synthesized ({failed} failed). Errors: {summary}")]
    AllChunksFailed { failed: usize, summary: String },
    #[error("audio assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("job store error: {0}")]
    Store(JobStoreError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<JobStoreError> for PipelineError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::NotFound(id) => PipelineError::JobNotFound(id),
            other => PipelineError::Store(other),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::JobNotFound(_) => AppError::NotFound("Job not found".to_string()),
            PipelineError::Extraction(e) => AppError::BadRequest(e.to_string()),
            PipelineError::NoChunks => AppError::BadRequest(err.to_string()),
            PipelineError::AllChunksFailed { .. } => AppError::ExternalService(err.to_string()),
            PipelineError::Assembly(e) => AppError::Internal(e.to_string()),
            PipelineError::Store(e) => AppError::Internal(e.to_string()),
            PipelineError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
