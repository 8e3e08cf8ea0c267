use super::chunk::{Chunk, ChunkOutcome};
use crate::infrastructure::repositories::{SynthesisError, TtsRepository};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Synthesizes exactly one chunk and never lets a failure escape.
///
/// Every provider error, timeout or empty result becomes a failure outcome for that
/// chunk's index only.
#[derive(Clone)]
pub struct SynthesisWorker {
    tts_repo: Arc<dyn TtsRepository>,
    timeout: Option<Duration>,
}

impl SynthesisWorker {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, timeout: Option<Duration>) -> Self {
        Self { tts_repo, timeout }
    }

    pub fn provider(&self) -> &'static str {
        self.tts_repo.provider()
    }

    pub async fn synthesize(&self, chunk: &Chunk, voice: &str) -> ChunkOutcome {
        let start_time = Instant::now();

        match self.call_provider(&chunk.text, voice).await {
            Ok(audio) => {
                tracing::debug!(
                    chunk_index = chunk.index,
                    voice = voice,
                    text_length = chunk.text.len(),
                    audio_size_bytes = audio.len(),
                    latency_ms = start_time.elapsed().as_millis(),
                    "Chunk synthesized"
                );
                ChunkOutcome::success(chunk.index, audio)
            }
            Err(e) => {
                tracing::warn!(
                    chunk_index = chunk.index,
                    voice = voice,
                    provider = self.tts_repo.provider(),
                    text_length = chunk.text.len(),
                    latency_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Chunk synthesis failed"
                );
                ChunkOutcome::failure(chunk.index, e)
            }
        }
    }

    async fn call_provider(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let call = self.tts_repo.synthesize(text, voice);
        let audio = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| SynthesisError::Timeout(limit))??,
            None => call.await?,
        };

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        Ok(audio)
    }
}
