//! `CvParser`: one call from uploaded bytes to `ParsedCandidateFields`.
//!
//! The only suspension point is the document decode, which runs on the
//! blocking pool. Field extraction then runs inline over the text. Parsers
//! share nothing mutable, so one instance can serve any number of concurrent
//! calls.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::document::{self, PdfEngines, RawDocument};
use crate::errors::{CvParseError, VocabularyError};
use crate::extraction::{self, ParsedCandidateFields};
use crate::vocabulary::Vocabulary;

#[derive(Clone)]
pub struct CvParser {
    vocabulary: Arc<Vocabulary>,
    pdf_engines: PdfEngines,
}

impl Default for CvParser {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl CvParser {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary: Arc::new(vocabulary),
            pdf_engines: PdfEngines::default(),
        }
    }

    pub fn with_pdf_engines(mut self, pdf_engines: PdfEngines) -> Self {
        self.pdf_engines = pdf_engines;
        self
    }

    /// Uses the vocabulary file named by the config, or the built-in tables.
    pub fn from_config(config: &Config) -> Result<Self, VocabularyError> {
        let vocabulary = match &config.vocabulary_path {
            Some(path) => {
                let vocabulary = Vocabulary::load(path)?;
                info!("Loaded vocabulary from {}", path.display());
                vocabulary
            }
            None => Vocabulary::default(),
        };
        Ok(Self::new(vocabulary))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extracts the text of `document` and runs the field pipeline over it.
    ///
    /// Text-extraction failures are terminal: no field extraction is
    /// attempted and the error carries a short `reason()` for the caller.
    pub async fn parse(&self, document: RawDocument) -> Result<ParsedCandidateFields, CvParseError> {
        let file_name = document.file_name.clone();
        let engines = self.pdf_engines.clone();

        let extracted =
            tokio::task::spawn_blocking(move || document::extract_text(&document, &engines))
                .await?;

        let text = match extracted {
            Ok(text) => text,
            Err(source) => {
                let err = CvParseError::ExtractionFailed { file_name, source };
                warn!("CV parse failed ({}): {err}", err.reason());
                return Err(err);
            }
        };

        let fields = extraction::extract_fields(text.as_str(), &self.vocabulary);
        info!(
            "Parsed '{file_name}': {} field(s) inferred from {} chars",
            fields.filled_count(),
            text.char_count()
        );
        Ok(fields)
    }

    /// Reads `path` and parses it. The file name (and so the extension
    /// fallback for format detection) comes from the path.
    pub async fn parse_path(
        &self,
        path: &Path,
        mime_type: Option<String>,
    ) -> Result<ParsedCandidateFields, CvParseError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| CvParseError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse(RawDocument::new(file_name, mime_type, content))
            .await
    }
}
