pub mod assembler;

pub use assembler::{AssemblyError, AudioAssembler, FileAudioAssembler};

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding finished audiobooks until they are downloaded or expire
#[derive(Debug, Clone)]
pub struct AudioStorage {
    output_dir: PathBuf,
    retention: Duration,
}

impl AudioStorage {
    pub fn new(output_dir: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            output_dir: output_dir.into(),
            retention,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist yet
    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create audio output directory {}",
                    self.output_dir.display()
                )
            })
    }

    /// Reject names that could escape the output directory or point at the directory itself
    pub fn is_valid_filename(filename: &str) -> bool {
        !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains('/')
            && !filename.contains('\\')
            && !filename.contains("..")
    }

    pub async fn write(&self, filename: &str, audio: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, audio).await?;
        Ok(path)
    }

    /// Read a finished file, `None` when it does not exist (expired or already served)
    pub async fn read(&self, filename: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.output_dir.join(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn remove(&self, filename: &str) {
        remove_file(&self.output_dir.join(filename)).await;
    }

    /// Delete the file once the retention period has passed
    pub fn schedule_deletion(&self, path: PathBuf) {
        let delay = self.retention;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            remove_file(&path).await;
        });
    }
}

async fn remove_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::info!(path = %path.display(), "Removed audio file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove audio file"),
    }
}
