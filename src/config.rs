use crate::ai::{AiProvider, PromptLanguage};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Directories
    pub inbox_dir: PathBuf,
    pub output_dir: PathBuf,

    // Extraction
    pub ocr_language: String,

    // AI Settings
    pub ai_provider: String,
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub prompt_language: String,

    // Retry
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox_dir: PathBuf::from("./toProcess"),
            output_dir: PathBuf::from("./output"),

            ocr_language: "fra".to_string(),

            // LM Studio exposes an OpenAI-compatible server on this port
            ai_provider: "openai".to_string(),
            api_base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            model: "bartowski/c4ai-command-r-v01-GGUF/c4ai-command-r-v01-Q3_K_L.gguf".to_string(),
            temperature: 0.7,
            request_timeout_secs: 300,
            prompt_language: "fr".to_string(),

            max_retries: 3,
            retry_backoff_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration from an optional JSON file with environment variable overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigError {
                    message: format!("Cannot read config file {}: {}", path.display(), e),
                })?;
                serde_json::from_str::<Self>(&content).map_err(|e| AppError::ConfigError {
                    message: format!("Invalid config file {}: {}", path.display(), e),
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(inbox) = std::env::var("DOCFILER_INBOX") {
            self.inbox_dir = PathBuf::from(inbox);
        }
        if let Ok(output) = std::env::var("DOCFILER_OUTPUT") {
            self.output_dir = PathBuf::from(output);
        }
        if let Ok(language) = std::env::var("DOCFILER_OCR_LANGUAGE") {
            self.ocr_language = language;
        }
        if let Ok(provider) = std::env::var("DOCFILER_AI_PROVIDER") {
            self.ai_provider = provider;
        }
        if let Ok(base_url) = std::env::var("DOCFILER_API_BASE_URL") {
            self.api_base_url = base_url;
        }
        if let Ok(api_key) = std::env::var("DOCFILER_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(model) = std::env::var("DOCFILER_MODEL") {
            self.model = model;
        }
        if let Ok(temperature) = std::env::var("DOCFILER_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(value) => self.temperature = value,
                Err(e) => {
                    tracing::warn!(
                        "Invalid DOCFILER_TEMPERATURE value '{}': {}. Using default.",
                        temperature,
                        e
                    );
                }
            }
        }
        if let Ok(retries) = std::env::var("DOCFILER_MAX_RETRIES") {
            match retries.parse::<u32>() {
                Ok(value) => self.max_retries = value,
                Err(e) => {
                    tracing::warn!(
                        "Invalid DOCFILER_MAX_RETRIES value '{}': {}. Using default.",
                        retries,
                        e
                    );
                }
            }
        }
    }

    /// Validate the configuration, reporting every problem at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        self.validate_directories(&mut errors);
        self.validate_ai_settings(&mut errors);

        if !errors.is_empty() {
            return Err(AppError::ConfigError {
                message: errors.join(", "),
            });
        }

        Ok(())
    }

    fn validate_directories(&self, errors: &mut Vec<String>) {
        if self.inbox_dir.as_os_str().is_empty() {
            errors.push("Inbox directory cannot be empty".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            errors.push("Output directory cannot be empty".to_string());
        }
        if !self.inbox_dir.as_os_str().is_empty() && self.inbox_dir == self.output_dir {
            errors.push("Inbox and output directories must differ".to_string());
        }
        if self.ocr_language.trim().is_empty() {
            errors.push("OCR language cannot be empty".to_string());
        }
    }

    fn validate_ai_settings(&self, errors: &mut Vec<String>) {
        if AiProvider::parse(&self.ai_provider).is_err() {
            errors.push(format!("Unsupported AI provider: {}", self.ai_provider));
        }

        if self.api_base_url.is_empty() {
            errors.push("API base URL cannot be empty".to_string());
        } else if let Err(e) = url::Url::parse(&self.api_base_url) {
            errors.push(format!("Invalid API base URL '{}': {}", self.api_base_url, e));
        }

        if self.model.trim().is_empty() {
            errors.push("Model cannot be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            errors.push(format!(
                "Temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            ));
        }

        if self.request_timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0".to_string());
        }

        if PromptLanguage::parse(&self.prompt_language).is_err() {
            errors.push(format!(
                "Unsupported prompt language: {}",
                self.prompt_language
            ));
        }
    }
}
