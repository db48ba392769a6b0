//! Stub collaborators shared by unit tests.

use crate::ai::CompletionClient;
use crate::core::document_processor::{PdfPage, PdfReader};
use crate::core::ocr_processor::{OcrEngine, OcrSession};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Completion stub that replays scripted responses, then repeats the last one.
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String>>>,
    fallback: Mutex<Option<String>>,
    pub calls: AtomicUsize,
    pub last_system_prompt: Mutex<Option<String>>,
    pub last_user_prompt: Mutex<Option<String>>,
}

impl ScriptedCompletion {
    pub fn always(response: &str) -> Arc<Self> {
        Self::sequence(vec![Ok(response.to_string())])
    }

    pub fn always_failing() -> Arc<Self> {
        Self::sequence(Vec::new())
    }

    pub fn sequence(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            fallback: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last_system_prompt: Mutex::new(None),
            last_user_prompt: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system_prompt.lock() = Some(system_prompt.to_string());
        *self.last_user_prompt.lock() = Some(user_prompt.to_string());

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(response)) => {
                *self.fallback.lock() = Some(response.clone());
                Ok(response)
            }
            Some(Err(e)) => Err(e),
            None => match self.fallback.lock().clone() {
                Some(response) => Ok(response),
                None => Err(AppError::NetworkError {
                    message: "completion backend unavailable".to_string(),
                }),
            },
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// OCR stub that counts acquire/release and returns fixed text.
#[derive(Default)]
pub struct CountingOcr {
    pub text: String,
    pub acquired: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub recognized: Arc<AtomicUsize>,
}

impl CountingOcr {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            ..Self::default()
        })
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl OcrEngine for CountingOcr {
    fn acquire(&self, _language: &str) -> Result<Box<dyn OcrSession>> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            text: self.text.clone(),
            released: self.released.clone(),
            recognized: self.recognized.clone(),
        }))
    }
}

struct CountingSession {
    text: String,
    released: Arc<AtomicUsize>,
    recognized: Arc<AtomicUsize>,
}

impl OcrSession for CountingSession {
    fn recognize(&mut self, _image_path: &Path) -> Result<String> {
        self.recognized.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }

    fn release(self: Box<Self>) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// PDF stub returning the same pages for every file.
pub struct FixedPdf(pub Vec<PdfPage>);

impl PdfReader for FixedPdf {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<PdfPage>> {
        Ok(self.0.clone())
    }
}
