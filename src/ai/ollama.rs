use crate::ai::{openai::request_error, CompletionClient};
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Client for Ollama's native `/api/chat` endpoint
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: url::Url,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(host: &str, model: &str, temperature: f32, timeout: Duration) -> Result<Self> {
        if host.is_empty() {
            return Err(AppError::InvalidInput {
                message: "Ollama host cannot be empty".to_string(),
            });
        }

        let parsed_host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let base = url::Url::parse(&parsed_host).map_err(|e| AppError::InvalidInput {
            message: format!("Invalid Ollama host URL '{}': {}", host, e),
        })?;

        let endpoint = base.join("/api/chat").map_err(|e| AppError::InvalidInput {
            message: format!("Invalid Ollama host URL '{}': {}", host, e),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            endpoint,
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            &config.model,
            config.temperature,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_predict": -1
            }
        });

        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(AppError::NetworkError {
                message: format!("Ollama chat request failed with status: {}", response.status()),
            });
        }

        let body: OllamaChatResponse =
            response.json().await.map_err(|e| AppError::Classification {
                message: format!("Malformed Ollama response: {}", e),
            })?;

        body.message
            .map(|m| m.content)
            .ok_or_else(|| AppError::Classification {
                message: "No message in Ollama chat output".to_string(),
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_without_scheme_gets_http() {
        let client =
            OllamaClient::new("localhost:11434", "llama3.2:3b", 0.7, Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:11434/api/chat");
        assert_eq!(client.model(), "llama3.2:3b");
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = OllamaClient::new("", "llama3.2:3b", 0.7, Duration::from_secs(5))
            .err()
            .unwrap();
        assert_eq!(err.error_type(), "INVALID_INPUT");
    }
}
