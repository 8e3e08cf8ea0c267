use crate::domain::job::{Job, JobId, JobStatus, JobUpdate};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobStoreError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
    #[error("job {0} can only receive a result when it completes")]
    ResultWithoutCompletion(JobId),
    #[error("job {id} was already started ({status})")]
    AlreadyStarted { id: JobId, status: JobStatus },
}

/// In-memory store of job records.
///
/// Records live for the lifetime of the process. All reads and writes go through one
/// `RwLock`, so a status poll never observes a half-applied update.
#[derive(Debug, Default)]
pub struct JobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job for the given voice
    pub async fn create(&self, voice: &str) -> JobId {
        let job = Job::new(voice.to_string());
        let id = job.id;

        self.jobs.write().await.insert(id, job);
        tracing::debug!(job_id = %id, voice = voice, "Job record created");

        id
    }

    /// Snapshot of a job record
    pub async fn get(&self, id: JobId) -> Result<Job, JobStoreError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(JobStoreError::NotFound(id))
    }

    /// Claim a pending job for processing.
    ///
    /// Only one caller can win: the check and the transition happen under the same write lock.
    pub async fn start(&self, id: JobId, message: impl Into<String>) -> Result<Job, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;

        if job.status != JobStatus::Pending {
            return Err(JobStoreError::AlreadyStarted {
                id,
                status: job.status,
            });
        }

        job.status = JobStatus::Processing;
        job.message = message.into();
        job.updated_at = Utc::now();

        Ok(job.clone())
    }

    /// Apply a partial update and return the resulting record
    pub async fn update(&self, id: JobId, update: JobUpdate) -> Result<Job, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;

        let next_status = update.status.unwrap_or(job.status);

        // Message-only updates on a finished job are rejected as well
        if job.status.is_terminal() || !job.status.can_transition_to(next_status) {
            return Err(JobStoreError::InvalidTransition {
                id,
                from: job.status,
                to: next_status,
            });
        }

        if update.result_ref.is_some() && next_status != JobStatus::Complete {
            return Err(JobStoreError::ResultWithoutCompletion(id));
        }

        job.status = next_status;
        if let Some(message) = update.message {
            job.message = message;
        }
        if let Some(result_ref) = update.result_ref {
            job.result_ref = Some(result_ref);
        }
        job.updated_at = Utc::now();

        Ok(job.clone())
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
