use super::chunk::{Chunk, ChunkOutcome, DispatchProgress, DispatchReport};
use super::worker::SynthesisWorker;
use crate::infrastructure::repositories::SynthesisError;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Fans a job's chunks out to synthesis workers with at most `concurrency` calls in
/// flight, and collects the outcomes back in original index order.
#[derive(Clone)]
pub struct ChunkDispatcher {
    worker: SynthesisWorker,
    concurrency: usize,
}

impl ChunkDispatcher {
    pub fn new(worker: SynthesisWorker, concurrency: usize) -> Self {
        Self {
            worker,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn provider(&self) -> &'static str {
        self.worker.provider()
    }

    /// Synthesize every chunk and return one outcome per chunk, ordered by index.
    ///
    /// Chunk failures never abort the dispatch. When `progress` is given, a running
    /// snapshot is published after each chunk finishes.
    pub async fn dispatch(
        &self,
        chunks: Vec<Chunk>,
        voice: &str,
        progress: Option<watch::Sender<DispatchProgress>>,
    ) -> DispatchReport {
        let total = chunks.len();
        // Each dispatch gets its own gate, jobs do not share a cap
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let voice: Arc<str> = Arc::from(voice);
        let progress = progress.map(Arc::new);

        tracing::debug!(
            chunk_count = total,
            concurrency = self.concurrency,
            "Dispatching chunks"
        );

        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let index = chunk.index;
                let worker = self.worker.clone();
                let gate = gate.clone();
                let voice = voice.clone();
                let progress = progress.clone();

                let handle = tokio::spawn(async move {
                    // The permit is held for the whole arm and released on drop, panics included
                    let outcome = match gate.acquire_owned().await {
                        Ok(_permit) => worker.synthesize(&chunk, &voice).await,
                        Err(e) => ChunkOutcome::failure(
                            chunk.index,
                            SynthesisError::Aborted(e.to_string()),
                        ),
                    };

                    if let Some(progress) = &progress {
                        progress.send_modify(|p| p.record(outcome.is_success()));
                    }

                    outcome
                });

                (index, handle)
            })
            .collect();

        let (indices, handles): (Vec<usize>, Vec<_>) = handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut slots: Vec<Option<ChunkOutcome>> = vec![None; total];
        for (index, result) in indices.into_iter().zip(results) {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    // The worker task panicked; only its own chunk is lost
                    tracing::error!(
                        chunk_index = index,
                        error = %join_error,
                        "Chunk synthesis task aborted"
                    );
                    if let Some(progress) = &progress {
                        progress.send_modify(|p| p.record(false));
                    }
                    ChunkOutcome::failure(index, SynthesisError::Aborted(join_error.to_string()))
                }
            };

            match slots.get_mut(outcome.index) {
                Some(slot) if slot.is_none() => *slot = Some(outcome),
                _ => tracing::error!(
                    chunk_index = outcome.index,
                    chunk_count = total,
                    "Discarding chunk outcome with unexpected index"
                ),
            }
        }

        let outcomes: Vec<ChunkOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    ChunkOutcome::failure(
                        index,
                        SynthesisError::Aborted("no outcome recorded".to_string()),
                    )
                })
            })
            .collect();

        DispatchReport::new(outcomes)
    }
}
