use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_END_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").unwrap());

pub const DEFAULT_MAX_SENTENCES: usize = 10;
pub const DEFAULT_MAX_CHARS: usize = 3000;

/// Splits plain text into an ordered sequence of synthesis chunks
pub trait TextSplitter: Send + Sync {
    /// Blank input yields an empty sequence
    fn split_into_chunks(&self, text: &str) -> Vec<String>;
}

/// Groups consecutive sentences into chunks bounded by sentence count and size
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    max_sentences: usize,
    max_chars: usize,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCES, DEFAULT_MAX_CHARS)
    }
}

impl SentenceSplitter {
    pub fn new(max_sentences: usize, max_chars: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
            max_chars: max_chars.max(1),
        }
    }

    /// Sentences of whitespace-normalized text, trailing text without punctuation included
    fn sentences(text: &str) -> Vec<String> {
        let normalized = WHITESPACE_PATTERN.replace_all(text, " ");
        let normalized = normalized.trim();

        let mut sentences = Vec::new();
        let mut last_end = 0;

        for mat in SENTENCE_END_PATTERN.find_iter(normalized) {
            sentences.push(normalized[last_end..mat.end()].trim().to_string());
            last_end = mat.end();
        }

        if last_end < normalized.len() {
            sentences.push(normalized[last_end..].trim().to_string());
        }

        sentences.retain(|s| !s.is_empty());
        sentences
    }

    /// Hard-split a sentence that alone exceeds the size limit
    fn split_oversized(&self, sentence: &str) -> Vec<String> {
        let chars: Vec<char> = sentence.chars().collect();
        chars
            .chunks(self.max_chars)
            .map(|piece| piece.iter().collect::<String>().trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

impl TextSplitter for SentenceSplitter {
    fn split_into_chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_sentences = 0;

        for sentence in Self::sentences(text) {
            let sentence_chars = sentence.chars().count();

            if sentence_chars > self.max_chars {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    current_sentences = 0;
                }
                chunks.extend(self.split_oversized(&sentence));
                continue;
            }

            // +1 for the joining space
            let would_be = current.chars().count() + sentence_chars + 1;
            if !current.is_empty()
                && (current_sentences >= self.max_sentences || would_be > self.max_chars)
            {
                chunks.push(std::mem::take(&mut current));
                current_sentences = 0;
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence);
            current_sentences += 1;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}
