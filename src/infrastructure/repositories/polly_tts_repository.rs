use super::tts_repository::{SynthesisError, TtsRepository};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
pub const MAX_REQUEST_CHARS: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Pick the neural engine when the voice supports it
    fn engine_for_voice(voice: &str) -> Engine {
        if is_voice_neural_compatible(voice) {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }
}

/// Check if a voice supports neural engine
fn is_voice_neural_compatible(voice: &str) -> bool {
    // Based on AWS Polly documentation
    const NEURAL_VOICES: &[&str] = &[
        // English
        "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin",
        "Ruth", "Stephen", "Amy", "Brian", "Emma", "Olivia", // Spanish
        "Lupe", "Pedro", "Sergio", "Lucia", // French
        "Lea", "Remi", // German
        "Vicki", "Daniel", // Italian
        "Bianca", "Adriano", // Portuguese
        "Ines", "Camila", "Vitoria", "Thiago", // Japanese
        "Takumi", "Kazuha", "Tomoko", // Korean
        "Seoyeon", // Mandarin Chinese
        "Zhiyu",   // Arabic
        "Hala", "Zayd",
    ];

    NEURAL_VOICES.contains(&voice)
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        let voice_id = VoiceId::from(voice);
        let engine = Self::engine_for_voice(voice);

        tracing::debug!(
            voice = voice,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = voice,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                SynthesisError::Provider(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::Provider(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();

        tracing::debug!(
            provider = "polly",
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio_bytes.len(),
            "Polly chunk synthesized"
        );

        Ok(audio_bytes)
    }

    fn provider(&self) -> &'static str {
        "polly"
    }
}
