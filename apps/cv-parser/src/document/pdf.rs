//! PDF page-text extraction with a primary and a secondary engine.
//!
//! `pdf-extract` is the primary engine. It produces the best reading order but
//! is known to panic or bail out on unusual font programs, so any such
//! load-class failure hands the same bytes to `lopdf` exactly once. Errors
//! that describe the document itself (encrypted, not a PDF) are returned
//! straight away because a second engine would fail the same way.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use lopdf::Document;
use tracing::{debug, warn};

use crate::errors::PdfEngineError;

/// Minimal contract needed from a PDF engine: load the bytes, walk the pages,
/// return each page's text in page order.
pub trait PdfEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, PdfEngineError>;
}

/// Primary engine backed by `pdf-extract`.
pub struct PdfExtractEngine;

impl PdfEngine for PdfExtractEngine {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, PdfEngineError> {
        if !has_pdf_header(bytes) {
            return Err(PdfEngineError::Malformed(
                "missing %PDF header".to_string(),
            ));
        }

        match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        })) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(PdfEngineError::Unavailable {
                engine: self.name(),
                message: e.to_string(),
            }),
            Err(_) => Err(PdfEngineError::Unavailable {
                engine: self.name(),
                message: "engine panicked while decoding".to_string(),
            }),
        }
    }
}

/// Secondary engine backed by `lopdf`'s content-stream text decoder.
pub struct LopdfEngine;

impl PdfEngine for LopdfEngine {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, PdfEngineError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfEngineError::Malformed(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfEngineError::Encrypted);
        }

        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    warn!("lopdf could not decode page {page_number}: {e}");
                    texts.push(String::new());
                }
            }
        }
        Ok(texts)
    }
}

/// Ordered engine pair. Cheap to clone; engines are shared.
#[derive(Clone)]
pub struct PdfEngines {
    primary: Arc<dyn PdfEngine>,
    secondary: Option<Arc<dyn PdfEngine>>,
}

impl Default for PdfEngines {
    fn default() -> Self {
        Self::new(Arc::new(PdfExtractEngine), Some(Arc::new(LopdfEngine)))
    }
}

impl PdfEngines {
    pub fn new(primary: Arc<dyn PdfEngine>, secondary: Option<Arc<dyn PdfEngine>>) -> Self {
        Self { primary, secondary }
    }

    /// Runs the primary engine and, on a recoverable failure only, the
    /// secondary engine once.
    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, PdfEngineError> {
        let err = match self.primary.page_texts(bytes) {
            Ok(pages) => {
                debug!("{} decoded {} page(s)", self.primary.name(), pages.len());
                return Ok(pages);
            }
            Err(err) => err,
        };

        match (&self.secondary, err.is_recoverable()) {
            (Some(secondary), true) => {
                warn!("{err}; retrying with {}", secondary.name());
                secondary.page_texts(bytes)
            }
            _ => Err(err),
        }
    }
}

/// Allows leading whitespace or a BOM before the header, as readers do.
fn has_pdf_header(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}
