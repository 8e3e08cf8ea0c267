use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("synthesis timed out after {0:?}")]
    Timeout(Duration),
    #[error("chunk text is empty")]
    EmptyInput,
    #[error("provider returned no audio")]
    EmptyAudio,
    #[error("synthesis task aborted: {0}")]
    Aborted(String),
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI, ...)
///
/// One call synthesizes one chunk. Splitting a document into provider-sized chunks and
/// merging the resulting audio happen outside of the repository.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize a single chunk of text with the given voice
    ///
    /// Returns encoded audio data (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError>;

    /// Short provider name used in logs and health checks
    fn provider(&self) -> &'static str;
}
