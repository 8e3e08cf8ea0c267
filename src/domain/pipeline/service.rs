use super::error::PipelineError;
use crate::domain::document::{SourceDocument, TextExtractor, TextSplitter};
use crate::domain::job::{Job, JobId, JobUpdate};
use crate::domain::synthesis::{Chunk, ChunkDispatcher, DispatchProgress, DispatchReport};
use crate::infrastructure::repositories::{JobRepository, JobStoreError};
use crate::infrastructure::storage::AudioAssembler;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How many distinct chunk errors end up in a failure message
const MAX_ERRORS_IN_MESSAGE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub result_ref: String,
    pub total_chunks: usize,
    pub succeeded_chunks: usize,
}

impl PipelineSummary {
    fn completion_message(&self) -> String {
        let failed = self.total_chunks - self.succeeded_chunks;
        if failed == 0 {
            format!(
                "Audiobook conversion complete: {}/{} chunks synthesized.",
                self.succeeded_chunks, self.total_chunks
            )
        } else {
            format!(
                "Audiobook conversion complete: {}/{} chunks synthesized ({} failed).",
                self.succeeded_chunks, self.total_chunks, failed
            )
        }
    }
}

pub struct PipelineService {
    job_repo: Arc<JobRepository>,
    extractor: Arc<dyn TextExtractor>,
    splitter: Arc<dyn TextSplitter>,
    dispatcher: ChunkDispatcher,
    assembler: Arc<dyn AudioAssembler>,
}

impl PipelineService {
    pub fn new(
        job_repo: Arc<JobRepository>,
        extractor: Arc<dyn TextExtractor>,
        splitter: Arc<dyn TextSplitter>,
        dispatcher: ChunkDispatcher,
        assembler: Arc<dyn AudioAssembler>,
    ) -> Self {
        Self {
            job_repo,
            extractor,
            splitter,
            dispatcher,
            assembler,
        }
    }

    /// Run the pipeline on a background task; the caller does not wait for it
    pub fn spawn_pipeline(self: &Arc<Self>, job_id: JobId, document: SourceDocument) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run_pipeline(job_id, document).await })
    }

    pub fn provider(&self) -> &'static str {
        self.dispatcher.provider()
    }
}

#[async_trait]
pub trait PipelineServiceApi: Send + Sync {
    /// Register a new pending job for the given voice
    async fn create_job(&self, voice: &str) -> JobId;

    /// Convert a document into a single audio file for an existing job
    ///
    /// This operation:
    /// - Extracts text and splits it into chunks
    /// - Synthesizes every chunk under the concurrency cap
    /// - Assembles the successful chunks in original order
    ///
    /// Never returns an error: failures end up in the job record.
    async fn run_pipeline(&self, job_id: JobId, document: SourceDocument);

    async fn get_status(&self, job_id: JobId) -> Result<Job, PipelineError>;
}

#[async_trait]
impl PipelineServiceApi for PipelineService {
    async fn create_job(&self, voice: &str) -> JobId {
        let job_id = self.job_repo.create(voice).await;
        tracing::info!(job_id = %job_id, voice = voice, "Job created");
        job_id
    }

    async fn run_pipeline(&self, job_id: JobId, document: SourceDocument) {
        // 1. Claim the job; extraction is the first stage
        let claim = self
            .job_repo
            .start(job_id, format!("Extracting text from {}...", document.filename))
            .await;
        let job = match claim {
            Ok(job) => job,
            Err(JobStoreError::NotFound(_)) => {
                tracing::warn!(job_id = %job_id, "Cannot run pipeline for unknown job");
                return;
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Pipeline already ran for this job, ignoring");
                return;
            }
        };

        let start_time = Instant::now();
        tracing::info!(
            job_id = %job_id,
            voice = %job.voice,
            filename = %document.filename,
            document_size = document.bytes.len(),
            "Starting document to audio conversion"
        );

        match self.execute(&job, document).await {
            Ok(summary) => {
                tracing::info!(
                    job_id = %job_id,
                    result_ref = %summary.result_ref,
                    total_chunks = summary.total_chunks,
                    succeeded_chunks = summary.succeeded_chunks,
                    latency_secs = start_time.elapsed().as_secs_f64(),
                    "Conversion completed"
                );
                let message = summary.completion_message();
                self.record(job_id, JobUpdate::complete(message, summary.result_ref))
                    .await;
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job_id,
                    error = %e,
                    latency_secs = start_time.elapsed().as_secs_f64(),
                    "Conversion failed"
                );
                self.record(job_id, JobUpdate::failed(format!("Conversion failed: {}", e)))
                    .await;
            }
        }
    }

    async fn get_status(&self, job_id: JobId) -> Result<Job, PipelineError> {
        Ok(self.job_repo.get(job_id).await?)
    }
}

impl PipelineService {
    async fn execute(&self, job: &Job, document: SourceDocument) -> Result<PipelineSummary, PipelineError> {
        let job_id = job.id;

        let text = self.extract(document).await?;

        // 2. Split into chunks
        self.job_repo
            .update(job_id, JobUpdate::processing("Splitting text into chunks..."))
            .await?;
        let chunks = Chunk::sequence(self.splitter.split_into_chunks(&text));
        if chunks.is_empty() {
            return Err(PipelineError::NoChunks);
        }
        let total_chunks = chunks.len();

        tracing::info!(
            job_id = %job_id,
            text_length = text.len(),
            chunk_count = total_chunks,
            "Text split into chunks"
        );

        // 3. Synthesize all chunks
        self.job_repo
            .update(
                job_id,
                JobUpdate::processing(format!("Synthesizing {} audio chunks...", total_chunks)),
            )
            .await?;
        let report = self.synthesize(job_id, chunks, &job.voice).await?;

        let succeeded_chunks = report.succeeded();
        if succeeded_chunks == 0 {
            return Err(PipelineError::AllChunksFailed {
                failed: report.failed(),
                summary: report.error_summary(MAX_ERRORS_IN_MESSAGE).join("; "),
            });
        }

        // 4. Assemble the successful chunks in order
        self.job_repo
            .update(
                job_id,
                JobUpdate::processing(format!(
                    "Synthesized {}/{} chunks. Combining audio...",
                    succeeded_chunks, total_chunks
                )),
            )
            .await?;
        let result_ref = self.assembler.assemble(job_id, report.into_audio()).await?;

        Ok(PipelineSummary {
            result_ref,
            total_chunks,
            succeeded_chunks,
        })
    }

    /// Extraction can be CPU heavy (HTML rendering), keep it off the async workers
    async fn extract(&self, document: SourceDocument) -> Result<String, PipelineError> {
        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&document))
            .await
            .map_err(|e| anyhow::anyhow!("text extraction task failed: {}", e))??;
        Ok(text)
    }

    /// Dispatch the chunks while mirroring live progress into the job message
    async fn synthesize(
        &self,
        job_id: JobId,
        chunks: Vec<Chunk>,
        voice: &str,
    ) -> Result<DispatchReport, PipelineError> {
        let (progress_tx, mut progress_rx) = watch::channel(DispatchProgress::new(chunks.len()));
        let dispatch = self.dispatcher.dispatch(chunks, voice, Some(progress_tx));
        tokio::pin!(dispatch);

        loop {
            tokio::select! {
                report = &mut dispatch => return Ok(report),
                Ok(()) = progress_rx.changed() => {
                    let progress = *progress_rx.borrow_and_update();
                    self.job_repo
                        .update(job_id, JobUpdate::message(progress_message(&progress)))
                        .await?;
                }
            }
        }
    }

    /// Store updates after the outcome is known; the job may only be missing if the
    /// store was torn down underneath us
    async fn record(&self, job_id: JobId, update: JobUpdate) {
        if let Err(e) = self.job_repo.update(job_id, update).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to record job outcome");
        }
    }
}

fn progress_message(progress: &DispatchProgress) -> String {
    if progress.failed == 0 {
        format!(
            "Synthesizing audio: {}/{} chunks processed",
            progress.completed, progress.total
        )
    } else {
        format!(
            "Synthesizing audio: {}/{} chunks processed ({} failed)",
            progress.completed, progress.total, progress.failed
        )
    }
}
