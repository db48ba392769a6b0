use crate::core::document_processor::{flatten_pages, PdfReader};
use crate::core::ocr_processor::{is_image_file, OcrEngine, OcrSession};
use crate::error::{AppError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Text,
    Pdf,
    Unsupported,
}

impl SourceKind {
    /// Classify a file purely by its lowercase extension
    pub fn from_path(path: &Path) -> Self {
        if is_image_file(path) {
            return Self::Image;
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Self::Text,
            "pdf" => Self::Pdf,
            _ => Self::Unsupported,
        }
    }
}

/// Routes a file to the right extraction backend.
///
/// Owns the batch's OCR session: it is acquired on the first image and
/// released by [`TextExtractor::finish`], or on drop if the batch bailed out.
/// A failed acquisition is not retried within the same batch.
pub struct TextExtractor {
    ocr_engine: Arc<dyn OcrEngine>,
    ocr_language: String,
    ocr_session: Option<Box<dyn OcrSession>>,
    ocr_failure: Option<String>,
    pdf_reader: Arc<dyn PdfReader>,
}

impl TextExtractor {
    pub fn new(
        ocr_engine: Arc<dyn OcrEngine>,
        ocr_language: impl Into<String>,
        pdf_reader: Arc<dyn PdfReader>,
    ) -> Self {
        Self {
            ocr_engine,
            ocr_language: ocr_language.into(),
            ocr_session: None,
            ocr_failure: None,
            pdf_reader,
        }
    }

    /// Extract plain text. Unsupported types yield an empty string.
    pub async fn extract(&mut self, path: &Path) -> Result<String> {
        let kind = SourceKind::from_path(path);
        debug!("Extracting text from {} as {:?}", path.display(), kind);

        match kind {
            SourceKind::Image => {
                let session = self.ocr_session(path)?;
                session.recognize(path)
            }
            SourceKind::Text => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    AppError::extraction(path, format!("Failed to read text: {}", e))
                })?;
                // Invalid UTF-8 (Latin-1 scans, Windows exports) becomes U+FFFD
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            SourceKind::Pdf => {
                let pages = self.pdf_reader.extract_pages(path)?;
                Ok(flatten_pages(&pages))
            }
            SourceKind::Unsupported => Ok(String::new()),
        }
    }

    /// Release the OCR session if one was acquired during the batch.
    pub fn finish(&mut self) -> Result<()> {
        self.ocr_failure = None;
        match self.ocr_session.take() {
            Some(session) => {
                info!("Releasing OCR session");
                session.release()
            }
            None => Ok(()),
        }
    }

    fn ocr_session(&mut self, path: &Path) -> Result<&mut Box<dyn OcrSession>> {
        if let Some(reason) = &self.ocr_failure {
            return Err(AppError::extraction(path, reason.clone()));
        }

        if self.ocr_session.is_none() {
            info!("Initializing OCR for language '{}'", self.ocr_language);
            match self.ocr_engine.acquire(&self.ocr_language) {
                Ok(session) => self.ocr_session = Some(session),
                Err(e) => {
                    warn!("OCR unavailable for this batch: {}", e);
                    let reason = e.to_string();
                    self.ocr_failure = Some(reason.clone());
                    return Err(AppError::extraction(path, reason));
                }
            }
        }

        self.ocr_session
            .as_mut()
            .ok_or_else(|| AppError::extraction(path, "OCR session unavailable"))
    }
}

impl Drop for TextExtractor {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("Failed to release OCR session: {}", e);
        }
    }
}
