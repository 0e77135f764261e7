use thiserror::Error;

/// Failure of a single PDF engine. Only `Unavailable` lets the next engine run.
#[derive(Debug, Error)]
pub enum PdfEngineError {
    /// The engine itself could not initialize or crashed while decoding.
    #[error("PDF engine '{engine}' unavailable: {message}")]
    Unavailable {
        engine: &'static str,
        message: String,
    },

    #[error("Document is password protected")]
    Encrypted,

    #[error("Malformed PDF: {0}")]
    Malformed(String),
}

impl PdfEngineError {
    /// True for load-class failures that justify trying the secondary engine.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PdfEngineError::Unavailable { .. })
    }
}

/// Text-extraction stage errors. All of them are terminal for a parse call.
#[derive(Debug, Error)]
pub enum DocumentFormatError {
    #[error("Unsupported format for '{file_name}' (mime: {mime_type}); only PDF and DOCX are accepted")]
    UnsupportedFormat {
        file_name: String,
        mime_type: String,
    },

    #[error("PDF extraction failed: {0}")]
    PdfExtractionFailed(#[from] PdfEngineError),

    #[error("DOCX extraction failed: {0}")]
    DocxExtractionFailed(String),
}

/// Error surfaced to callers of `CvParser`.
#[derive(Debug, Error)]
pub enum CvParseError {
    #[error("Could not extract text from '{file_name}': {source}")]
    ExtractionFailed {
        file_name: String,
        #[source]
        source: DocumentFormatError,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parser task aborted: {0}")]
    TaskAborted(#[from] tokio::task::JoinError),
}

impl CvParseError {
    /// Short human-readable reason suitable for an inline form message.
    pub fn reason(&self) -> &'static str {
        match self {
            CvParseError::ExtractionFailed { source, .. } => match source {
                DocumentFormatError::UnsupportedFormat { .. } => "unsupported file type",
                DocumentFormatError::PdfExtractionFailed(PdfEngineError::Encrypted) => {
                    "password protected"
                }
                DocumentFormatError::PdfExtractionFailed(_)
                | DocumentFormatError::DocxExtractionFailed(_) => "invalid format",
            },
            CvParseError::Io { .. } => "file could not be read",
            CvParseError::TaskAborted(_) => "parsing was interrupted",
        }
    }
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Invalid vocabulary pattern for '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse vocabulary TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding vector is empty")]
    EmptyEmbedding,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction_failed(source: DocumentFormatError) -> CvParseError {
        CvParseError::ExtractionFailed {
            file_name: "cv.pdf".to_string(),
            source,
        }
    }

    #[test]
    fn test_only_unavailable_is_recoverable() {
        let unavailable = PdfEngineError::Unavailable {
            engine: "pdf-extract",
            message: "panicked".to_string(),
        };
        assert!(unavailable.is_recoverable());
        assert!(!PdfEngineError::Encrypted.is_recoverable());
        assert!(!PdfEngineError::Malformed("bad xref".to_string()).is_recoverable());
    }

    #[test]
    fn test_reason_password_protected() {
        let err = extraction_failed(DocumentFormatError::PdfExtractionFailed(
            PdfEngineError::Encrypted,
        ));
        assert_eq!(err.reason(), "password protected");
    }

    #[test]
    fn test_reason_invalid_format_for_docx() {
        let err = extraction_failed(DocumentFormatError::DocxExtractionFailed(
            "missing word/document.xml".to_string(),
        ));
        assert_eq!(err.reason(), "invalid format");
    }

    #[test]
    fn test_display_names_the_file() {
        let err = extraction_failed(DocumentFormatError::UnsupportedFormat {
            file_name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
        });
        let message = err.to_string();
        assert!(message.contains("cv.pdf"), "Message was {message}");
        assert!(message.contains("notes.txt"), "Message was {message}");
    }
}
