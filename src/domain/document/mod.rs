pub mod extractor;
pub mod splitter;

pub use extractor::{DocumentTextExtractor, ExtractionError, TextExtractor};
pub use splitter::{SentenceSplitter, TextSplitter};

use std::path::Path;

/// Document formats the text extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Html,
    Pdf,
}

impl DocumentKind {
    fn from_content_type(content_type: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=utf-8"
        let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "text/plain" | "text/markdown" => Some(DocumentKind::PlainText),
            "text/html" | "application/xhtml+xml" => Some(DocumentKind::Html),
            "application/pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }

    fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "txt" | "text" | "md" | "markdown" => Some(DocumentKind::PlainText),
            "html" | "htm" | "xhtml" => Some(DocumentKind::Html),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// An uploaded document waiting to be converted
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(filename: String, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Kind from the declared content type, falling back to the file extension
    pub fn kind(&self) -> Option<DocumentKind> {
        self.content_type
            .as_deref()
            .and_then(DocumentKind::from_content_type)
            .or_else(|| DocumentKind::from_filename(&self.filename))
    }
}
