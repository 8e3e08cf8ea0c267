use crate::infrastructure::repositories::SynthesisError;
use std::sync::Arc;

/// One unit of text scheduled for synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the original sequence, the only ordering key
    pub index: usize,
    pub text: Arc<str>,
}

impl Chunk {
    pub fn new(index: usize, text: impl Into<Arc<str>>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Number chunks in the order the splitter produced them
    pub fn sequence<I, S>(texts: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(index, text))
            .collect()
    }
}

/// Result of synthesizing one chunk, tagged with its index
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    pub index: usize,
    pub result: Result<Vec<u8>, SynthesisError>,
}

impl ChunkOutcome {
    pub fn success(index: usize, audio: Vec<u8>) -> Self {
        Self {
            index,
            result: Ok(audio),
        }
    }

    pub fn failure(index: usize, error: SynthesisError) -> Self {
        Self {
            index,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Running counts published while a dispatch is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchProgress {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, success: bool) {
        self.completed += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Every chunk outcome of one dispatch, in original index order
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    outcomes: Vec<ChunkOutcome>,
}

impl DispatchReport {
    pub(crate) fn new(outcomes: Vec<ChunkOutcome>) -> Self {
        debug_assert!(outcomes.iter().enumerate().all(|(i, o)| o.index == i));
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ChunkOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Distinct failure reasons, in the order they first occurred
    pub fn error_summary(&self, limit: usize) -> Vec<String> {
        let mut reasons: Vec<String> = Vec::new();
        for outcome in &self.outcomes {
            if let Err(e) = &outcome.result {
                let reason = e.to_string();
                if !reasons.contains(&reason) {
                    reasons.push(reason);
                }
            }
        }
        reasons.truncate(limit);
        reasons
    }

    /// Successful audio buffers, still in index order
    pub fn into_audio(self) -> Vec<Vec<u8>> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect()
    }
}
