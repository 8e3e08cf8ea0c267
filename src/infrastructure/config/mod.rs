use crate::domain::document::splitter::{DEFAULT_MAX_CHARS, DEFAULT_MAX_SENTENCES};
use crate::domain::synthesis::DEFAULT_CONCURRENCY;
use crate::infrastructure::repositories::{openai_tts_repository, polly_tts_repository};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TTS provider
    pub tts_engine: TtsEngine,
    pub aws_region: String,
    pub openai_tts_model: String,
    pub tts_cache_enabled: bool,
    // Synthesis pipeline
    pub synthesis_concurrency: usize,
    /// Seconds allowed per chunk, 0 disables the timeout
    pub synthesis_timeout_secs: u64,
    pub chunk_max_sentences: usize,
    pub chunk_max_chars: usize,
    // Storage
    pub output_dir: PathBuf,
    pub audio_retention_secs: u64,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngine {
    Polly,
    OpenAi,
}

impl TtsEngine {
    /// Longest text the provider accepts in one request
    pub fn max_request_chars(&self) -> usize {
        match self {
            TtsEngine::Polly => polly_tts_repository::MAX_REQUEST_CHARS,
            TtsEngine::OpenAi => openai_tts_repository::MAX_REQUEST_CHARS,
        }
    }

    fn parse(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "polly" => Ok(TtsEngine::Polly),
            "openai" => Ok(TtsEngine::OpenAi),
            other => Err(format!("Unsupported TTS_ENGINE: {}", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            tts_engine: TtsEngine::parse(
                &env::var("TTS_ENGINE").unwrap_or_else(|_| "polly".to_string()),
            )?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            tts_cache_enabled: env::var("TTS_CACHE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            synthesis_concurrency: env::var("SYNTHESIS_CONCURRENCY")
                .unwrap_or_else(|_| DEFAULT_CONCURRENCY.to_string())
                .parse::<usize>()?
                .max(1),
            synthesis_timeout_secs: env::var("SYNTHESIS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            chunk_max_sentences: env::var("CHUNK_MAX_SENTENCES")
                .unwrap_or_else(|_| DEFAULT_MAX_SENTENCES.to_string())
                .parse()?,
            chunk_max_chars: env::var("CHUNK_MAX_CHARS")
                .unwrap_or_else(|_| DEFAULT_MAX_CHARS.to_string())
                .parse()?,
            output_dir: env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "data/final_audio".to_string())
                .into(),
            audio_retention_secs: env::var("AUDIO_RETENTION_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn synthesis_timeout(&self) -> Option<Duration> {
        match self.synthesis_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Chunk size limit, never above what the selected provider accepts
    pub fn effective_chunk_max_chars(&self) -> usize {
        self.chunk_max_chars.min(self.tts_engine.max_request_chars())
    }

    pub fn audio_retention(&self) -> Duration {
        Duration::from_secs(self.audio_retention_secs)
    }
}
