use super::tts_repository::{SynthesisError, TtsRepository};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Caching decorator around another TTS repository.
///
/// Keyed by `(voice, text)`, so documents with repeated passages only pay for each
/// distinct chunk once. Failures are never cached.
pub struct CachedTtsRepository {
    inner: Arc<dyn TtsRepository>,
    cache: Cache<(String, String), Arc<Vec<u8>>>,
}

impl CachedTtsRepository {
    pub fn new(inner: Arc<dyn TtsRepository>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
            .build();

        Self { inner, cache }
    }
}

#[async_trait]
impl TtsRepository for CachedTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        let key = (voice.to_string(), text.to_string());

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(
                voice = voice,
                text_length = text.len(),
                cached_audio_size = cached.len(),
                "TTS cache hit"
            );
            return Ok(cached.as_ref().clone());
        }

        let audio = self.inner.synthesize(text, voice).await?;
        self.cache.insert(key, Arc::new(audio.clone())).await;

        Ok(audio)
    }

    fn provider(&self) -> &'static str {
        self.inner.provider()
    }
}
