use async_trait::async_trait;
use audiobook_weaver::infrastructure::repositories::{SynthesisError, TtsRepository};

/// Minimal MP3 frame header prepended to every mocked chunk
pub const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

/// TTS double that "speaks" by echoing the text back inside an MP3 frame header
#[derive(Default)]
pub struct MockTts {
    fail_when_contains: Vec<String>,
}

impl MockTts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every chunk whose text contains `needle`
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_when_contains.push(needle.to_string());
        self
    }

    /// Fail every chunk
    pub fn always_failing() -> Self {
        Self::new().failing_on("")
    }
}

pub fn mock_audio_for(text: &str) -> Vec<u8> {
    let mut audio = MP3_FRAME_HEADER.to_vec();
    audio.extend_from_slice(format!("[{}]", text).as_bytes());
    audio
}

#[async_trait]
impl TtsRepository for MockTts {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>, SynthesisError> {
        if self
            .fail_when_contains
            .iter()
            .any(|needle| text.contains(needle.as_str()))
        {
            return Err(SynthesisError::Provider("mock provider rejected text".to_string()));
        }

        // Give later chunks a chance to finish first
        tokio::time::sleep(std::time::Duration::from_millis(
            (50 - text.len().min(50)) as u64,
        ))
        .await;

        Ok(mock_audio_for(text))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
