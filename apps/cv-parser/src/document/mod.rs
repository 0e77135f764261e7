// Document Text Extractor
// Turns an uploaded PDF or DOCX into one plain-text string for the field pipeline.
// Pure transformation: nothing is written to disk, nothing leaves the process.

pub mod docx;
pub mod pdf;

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::errors::DocumentFormatError;

pub use pdf::{LopdfEngine, PdfEngine, PdfEngines, PdfExtractEngine};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Parameters such as `; charset=binary` are ignored.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(DocumentKind::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    /// Accepts the document if either the declared MIME type or the file
    /// extension names a supported format. The MIME type is consulted first.
    pub fn detect(mime_type: Option<&str>, file_name: &str) -> Option<Self> {
        mime_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_file_name(file_name))
    }
}

/// An uploaded file as handed over by the caller. Consumed once per parse.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub content: Bytes,
}

impl RawDocument {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: Option<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            content: content.into(),
        }
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(self.mime_type.as_deref(), &self.file_name)
    }
}

/// Plain text of a whole document; pages and paragraphs are separated by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Length in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the text of a PDF or DOCX document.
///
/// Unsupported documents fail before any engine is touched.
pub fn extract_text(
    document: &RawDocument,
    pdf_engines: &PdfEngines,
) -> Result<ExtractedText, DocumentFormatError> {
    let kind = document
        .kind()
        .ok_or_else(|| DocumentFormatError::UnsupportedFormat {
            file_name: document.file_name.clone(),
            mime_type: document
                .mime_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        })?;

    debug!(
        "Extracting text from '{}' as {:?} ({} bytes)",
        document.file_name,
        kind,
        document.content.len()
    );

    let blocks = match kind {
        DocumentKind::Pdf => pdf_engines.extract(&document.content)?,
        DocumentKind::Docx => docx::extract_paragraphs(&document.content)?,
    };

    Ok(ExtractedText::new(join_blocks(&blocks)))
}

/// Joins pages (or paragraphs) with newlines. Inside each block, runs of
/// spaces and tabs collapse to one space, line breaks survive and blank lines
/// are dropped.
fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .flat_map(|block| block.lines())
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
