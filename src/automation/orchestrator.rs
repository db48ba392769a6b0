use crate::{
    ai::{ClassificationResult, Classifier, CompletionClient, PromptLanguage},
    config::Config,
    core::{OcrEngine, Organizer, PdfReader, TaxonomyStore, TextExtractor},
    error::{ErrorReport, Result},
    utils::retry::RetryPolicy,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Final state of one inbox file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Filed {
        file: String,
        destination: PathBuf,
        classification: ClassificationResult,
        attempts: u32,
    },
    Abandoned {
        file: String,
        attempts: u32,
        error: ErrorReport,
    },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            Self::Filed { file, .. } | Self::Abandoned { file, .. } => file,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Filed { attempts, .. } | Self::Abandoned { attempts, .. } => *attempts,
        }
    }

    pub fn is_filed(&self) -> bool {
        matches!(self, Self::Filed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn filed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_filed()).count()
    }

    pub fn abandoned(&self) -> usize {
        self.outcomes.len() - self.filed()
    }
}

/// Drives every inbox file through extract → classify → register → file.
///
/// Files are handled one at a time. A failed attempt restarts the whole
/// pipeline for that file until the retry policy is exhausted; the file is
/// then left in the inbox and the batch moves on.
pub struct BatchOrchestrator {
    inbox: PathBuf,
    extractor: TextExtractor,
    classifier: Classifier,
    organizer: Organizer,
    retry: RetryPolicy,
}

impl BatchOrchestrator {
    pub fn new(
        inbox: impl Into<PathBuf>,
        extractor: TextExtractor,
        classifier: Classifier,
        organizer: Organizer,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inbox: inbox.into(),
            extractor,
            classifier,
            organizer,
            retry,
        }
    }

    pub fn from_config(
        config: &Config,
        client: Arc<dyn CompletionClient>,
        ocr_engine: Arc<dyn OcrEngine>,
        pdf_reader: Arc<dyn PdfReader>,
    ) -> Result<Self> {
        Ok(Self::new(
            &config.inbox_dir,
            TextExtractor::new(ocr_engine, config.ocr_language.clone(), pdf_reader),
            Classifier::new(client, PromptLanguage::parse(&config.prompt_language)?),
            Organizer::new(&config.output_dir),
            RetryPolicy::from_config(config),
        ))
    }

    pub fn organizer(&self) -> &Organizer {
        &self.organizer
    }

    /// Process every file present in the inbox when the batch starts.
    ///
    /// Only a failure to list the inbox aborts the batch. The OCR session is
    /// released on every exit path.
    pub async fn run(&mut self, taxonomy: &mut TaxonomyStore) -> Result<BatchReport> {
        let started_at = Utc::now();
        info!("Reading files in {}", self.inbox.display());

        let result = self.run_listed(taxonomy).await;

        if let Err(e) = self.extractor.finish() {
            warn!("Failed to release OCR session: {}", e);
        }

        let outcomes = result.map_err(|e| {
            error!("Unable to scan inbox {}: {}", self.inbox.display(), e);
            e
        })?;

        Ok(BatchReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        })
    }

    async fn run_listed(&mut self, taxonomy: &mut TaxonomyStore) -> Result<Vec<FileOutcome>> {
        let files = list_inbox(&self.inbox).await?;
        info!("Found {} files to process", files.len());

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.process_file(&file, taxonomy).await);
        }

        Ok(outcomes)
    }

    /// Handle one inbox file with the bounded retry loop.
    ///
    /// `file` is the entry name inside the inbox; it is shown lossily in logs
    /// and the report but never used lossily to reach the file.
    pub async fn process_file(
        &mut self,
        file: impl AsRef<Path>,
        taxonomy: &mut TaxonomyStore,
    ) -> FileOutcome {
        let path = self.inbox.join(file.as_ref());
        let file = file.as_ref().to_string_lossy().into_owned();
        info!("Handling file {}", file);

        let mut attempt = 0;
        loop {
            attempt += 1;

            match self.run_pipeline(&path, taxonomy).await {
                Ok((destination, classification)) => {
                    return FileOutcome::Filed {
                        file,
                        destination,
                        classification,
                        attempts: attempt,
                    };
                }
                Err(e) if attempt < self.retry.max_attempts() => {
                    let backoff = self.retry.backoff_for(attempt);
                    warn!(
                        "Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                        attempt,
                        self.retry.max_attempts(),
                        file,
                        e,
                        backoff
                    );
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                }
                Err(e) => {
                    error!(
                        "Failed to process {} after {} attempts, skipping: {}",
                        file, attempt, e
                    );
                    return FileOutcome::Abandoned {
                        file,
                        attempts: attempt,
                        error: e.report(),
                    };
                }
            }
        }
    }

    /// One attempt. Registration only happens after a successful classification.
    async fn run_pipeline(
        &mut self,
        path: &Path,
        taxonomy: &mut TaxonomyStore,
    ) -> Result<(PathBuf, ClassificationResult)> {
        let text = self.extractor.extract(path).await?;
        let classification = self.classifier.classify(&text, taxonomy).await?;
        taxonomy.register(&classification.group, &classification.subgroup);
        let destination = self.organizer.file(path, &classification).await?;
        Ok((destination, classification))
    }
}

/// Names of the regular files in the inbox, sorted
async fn list_inbox(inbox: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let mut dir = tokio::fs::read_dir(inbox).await?;
    while let Some(entry) = dir.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(PathBuf::from(entry.file_name()));
        }
    }

    files.sort();
    Ok(files)
}
