pub mod classifier;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod response;


pub use classifier::{ClassificationResult, Classifier};
pub use prompt::PromptLanguage;

use crate::{
    config::Config,
    error::{AppError, Result},
};
use async_trait::async_trait;
use std::sync::Arc;

/// A chat completion endpoint: one system instruction, one user message, raw text back.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Ollama,
}

impl AiProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            invalid => Err(AppError::ConfigError {
                message: format!("Unsupported AI provider: {}", invalid),
            }),
        }
    }
}

/// Build the completion backend selected by the configuration
pub fn create_completion_client(config: &Config) -> Result<Arc<dyn CompletionClient>> {
    let client: Arc<dyn CompletionClient> = match AiProvider::parse(&config.ai_provider)? {
        AiProvider::OpenAi => Arc::new(openai::OpenAiClient::from_config(config)?),
        AiProvider::Ollama => Arc::new(ollama::OllamaClient::from_config(config)?),
    };

    tracing::info!(
        "Using {} completion backend with model {}",
        config.ai_provider,
        client.model()
    );

    Ok(client)
}
