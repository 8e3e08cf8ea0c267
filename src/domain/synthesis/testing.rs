//! Scripted TTS provider for exercising the synthesis pipeline in tests.

use crate::infrastructure::repositories::{SynthesisError, TtsRepository};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Returns `"{voice}:{text}"` as audio unless told otherwise for a given text.
/// Tracks how many calls are in flight at once.
#[derive(Default)]
pub(crate) struct ScriptedTts {
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    silent: HashSet<String>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    /// Per voice: (in flight now, peak in flight)
    voice_active: Mutex<HashMap<String, (usize, usize)>>,
    completed: Mutex<Vec<String>>,
}

struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct VoiceGuard<'a> {
    voice_active: &'a Mutex<HashMap<String, (usize, usize)>>,
    voice: String,
}

impl Drop for VoiceGuard<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.voice_active.lock().unwrap().get_mut(&self.voice) {
            entry.0 -= 1;
        }
    }
}

impl ScriptedTts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub(crate) fn delay_on(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    pub(crate) fn fail_on(mut self, text: &str) -> Self {
        self.failures.insert(text.to_string());
        self
    }

    pub(crate) fn panic_on(mut self, text: &str) -> Self {
        self.panics.insert(text.to_string());
        self
    }

    pub(crate) fn silent_on(mut self, text: &str) -> Self {
        self.silent.insert(text.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Peak number of calls in flight at once for one voice
    pub(crate) fn max_active_for(&self, voice: &str) -> usize {
        self.voice_active
            .lock()
            .unwrap()
            .get(voice)
            .map(|(_, peak)| *peak)
            .unwrap_or(0)
    }

    pub(crate) fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for ScriptedTts {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        let _guard = ActiveGuard(&self.active);

        {
            let mut voice_active = self.voice_active.lock().unwrap();
            let entry = voice_active.entry(voice.to_string()).or_default();
            entry.0 += 1;
            entry.1 = entry.1.max(entry.0);
        }
        let _voice_guard = VoiceGuard {
            voice_active: &self.voice_active,
            voice: voice.to_string(),
        };

        let delay = self.delays.get(text).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panics.contains(text) {
            panic!("scripted panic for {}", text);
        }

        self.completed.lock().unwrap().push(text.to_string());

        if self.failures.contains(text) {
            return Err(SynthesisError::Provider(format!("scripted failure for {}", text)));
        }
        if self.silent.contains(text) {
            return Ok(Vec::new());
        }

        Ok(format!("{}:{}", voice, text).into_bytes())
    }

    fn provider(&self) -> &'static str {
        "scripted"
    }
}
