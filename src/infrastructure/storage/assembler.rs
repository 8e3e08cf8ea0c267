use super::AudioStorage;
use crate::domain::job::JobId;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no audio to assemble")]
    NoAudio,
    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Joins ordered audio buffers into one final artifact
#[async_trait]
pub trait AudioAssembler: Send + Sync {
    /// Returns a reference (file name) identifying the assembled artifact
    async fn assemble(&self, job_id: JobId, buffers: Vec<Vec<u8>>) -> Result<String, AssemblyError>;
}

/// Writes `<job_id>.mp3` into the audio storage directory.
///
/// MP3 streams are sequences of self-contained frames, so byte concatenation in chunk
/// order yields a playable file.
pub struct FileAudioAssembler {
    storage: Arc<AudioStorage>,
}

impl FileAudioAssembler {
    pub fn new(storage: Arc<AudioStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl AudioAssembler for FileAudioAssembler {
    async fn assemble(&self, job_id: JobId, buffers: Vec<Vec<u8>>) -> Result<String, AssemblyError> {
        if buffers.iter().all(|b| b.is_empty()) {
            return Err(AssemblyError::NoAudio);
        }

        let segment_count = buffers.len();
        let merged_audio = buffers.concat();
        let filename = format!("{}.mp3", job_id);

        let path = self.storage.write(&filename, &merged_audio).await?;
        self.storage.schedule_deletion(path.clone());

        tracing::info!(
            job_id = %job_id,
            path = %path.display(),
            segment_count = segment_count,
            audio_size_bytes = merged_audio.len(),
            "Audio assembled"
        );

        Ok(filename)
    }
}
