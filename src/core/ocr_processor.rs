use crate::error::Result;
use std::path::Path;

/// Loads OCR language data and hands out recognition sessions.
pub trait OcrEngine: Send + Sync {
    /// Load and initialize the engine for `language`. Expensive; done once per batch.
    fn acquire(&self, language: &str) -> Result<Box<dyn OcrSession>>;
}

/// An initialized OCR engine. Must be released exactly once.
pub trait OcrSession: Send {
    fn recognize(&mut self, image_path: &Path) -> Result<String>;
    fn release(self: Box<Self>) -> Result<()>;
}

/// Check if a file is an image that is routed to OCR
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg"))
}

/// Tesseract-backed OCR, available with the `ocr` feature.
/// Language data is looked up through `TESSDATA_PREFIX`.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for TesseractEngine {
    fn acquire(&self, language: &str) -> Result<Box<dyn OcrSession>> {
        tracing::info!("Loading Tesseract language data '{}'", language);
        let engine = tesseract::Tesseract::new(None, Some(language))
            .map_err(|e| anyhow::anyhow!("Failed to initialize Tesseract: {}", e))?;

        Ok(Box::new(TesseractSession {
            language: language.to_string(),
            engine: Some(engine),
        }))
    }
}

#[cfg(not(feature = "ocr"))]
impl OcrEngine for TesseractEngine {
    fn acquire(&self, _language: &str) -> Result<Box<dyn OcrSession>> {
        Err(anyhow::anyhow!("OCR functionality not available - build with the 'ocr' feature").into())
    }
}

#[cfg(feature = "ocr")]
struct TesseractSession {
    language: String,
    engine: Option<tesseract::Tesseract>,
}

#[cfg(feature = "ocr")]
impl OcrSession for TesseractSession {
    fn recognize(&mut self, image_path: &Path) -> Result<String> {
        use crate::error::AppError;

        let path_str = image_path
            .to_str()
            .ok_or_else(|| AppError::extraction(image_path, "Path is not valid UTF-8"))?;

        // set_image consumes the engine; a failed call leaves us without one
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => tesseract::Tesseract::new(None, Some(&self.language))
                .map_err(|e| {
                    AppError::extraction(image_path, format!("Failed to reinitialize Tesseract: {}", e))
                })?,
        };

        let mut engine = engine
            .set_image(path_str)
            .map_err(|e| AppError::extraction(image_path, format!("Failed to load image: {}", e)))?;

        let text = engine.get_text();
        self.engine = Some(engine);

        text.map_err(|e| AppError::extraction(image_path, format!("Failed to extract text: {}", e)))
    }

    fn release(mut self: Box<Self>) -> Result<()> {
        tracing::info!("Terminating Tesseract session");
        self.engine.take();
        Ok(())
    }
}
