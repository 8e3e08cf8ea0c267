use super::{DocumentKind, SourceDocument};
use html2text::from_read;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s)\]]+").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("document is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
    #[error("could not read PDF: {0}")]
    InvalidPdf(String),
    #[error("Could not extract text from document")]
    NoText,
}

/// Turns a source document into plain text
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, document: &SourceDocument) -> Result<String, ExtractionError>;
}

/// Extractor for the formats accepted on upload (PDF, plain text, Markdown, HTML)
#[derive(Debug, Default, Clone)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Convert HTML to plain text and drop URLs, which only add noise when read aloud
    fn html_to_text(html: &str) -> String {
        let plain_text = from_read(html.as_bytes(), usize::MAX);
        URL_PATTERN.replace_all(&plain_text, "").into_owned()
    }

    /// Text of every page, in page order
    fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractionError> {
        // The PDF parser panics on some malformed files
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::InvalidPdf(e.to_string())),
            Err(_) => Err(ExtractionError::InvalidPdf(
                "parser aborted on malformed document".to_string(),
            )),
        }
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract_text(&self, document: &SourceDocument) -> Result<String, ExtractionError> {
        let kind = document.kind().ok_or_else(|| {
            ExtractionError::UnsupportedFormat(
                document
                    .content_type
                    .clone()
                    .unwrap_or_else(|| document.filename.clone()),
            )
        })?;

        let text = match kind {
            DocumentKind::PlainText => String::from_utf8(document.bytes.clone())?,
            DocumentKind::Html => Self::html_to_text(&String::from_utf8(document.bytes.clone())?),
            DocumentKind::Pdf => Self::pdf_to_text(&document.bytes)?,
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }

        tracing::debug!(
            filename = %document.filename,
            kind = ?kind,
            original_size = document.bytes.len(),
            text_length = text.len(),
            "Text extracted from document"
        );

        Ok(text)
    }
}
