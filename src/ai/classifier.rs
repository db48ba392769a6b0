use crate::ai::prompt::{build_system_prompt, PromptLanguage};
use crate::ai::response::{into_classification, parse_model_json};
use crate::ai::CompletionClient;
use crate::core::TaxonomyStore;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Where and under which name a document is filed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub filename: String,
    pub group: String,
    pub subgroup: String,
}

pub struct Classifier {
    client: Arc<dyn CompletionClient>,
    language: PromptLanguage,
}

impl Classifier {
    pub fn new(client: Arc<dyn CompletionClient>, language: PromptLanguage) -> Self {
        Self { client, language }
    }

    /// Ask the model for a filename and a group/subgroup for `text`.
    ///
    /// Either a fully validated result or an error; nothing partial.
    pub async fn classify(&self, text: &str, taxonomy: &TaxonomyStore) -> Result<ClassificationResult> {
        let (groups, subgroups) = taxonomy.snapshot();
        let system_prompt = build_system_prompt(&groups, &subgroups, self.language);

        let response = self.client.complete(&system_prompt, text).await?;
        debug!("Raw classification response: {}", response);

        let value = parse_model_json(&response)?;
        into_classification(value)
    }
}
