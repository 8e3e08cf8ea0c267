pub mod cached_tts_repository;
pub mod job_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use cached_tts_repository::CachedTtsRepository;
pub use job_repository::{JobRepository, JobStoreError};
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::{SynthesisError, TtsRepository};
