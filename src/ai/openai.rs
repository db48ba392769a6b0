use crate::ai::CompletionClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for OpenAI-compatible `/chat/completions` servers (LM Studio, llama.cpp, vLLM, ...)
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: url::Url,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = chat_endpoint(base_url)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            &config.api_key,
            &config.model,
            config.temperature,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

fn chat_endpoint(base_url: &str) -> Result<url::Url> {
    let joined = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    url::Url::parse(&joined).map_err(|e| AppError::ConfigError {
        message: format!("Invalid API base URL '{}': {}", base_url, e),
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    /// -1 lets the server generate until the model stops
    max_tokens: i32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: -1,
            stream: false,
        };

        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NetworkError {
                message: format!(
                    "Completion request failed with status {}: {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| AppError::Classification {
            message: format!("Malformed completion response: {}", e),
        })?;

        extract_content(body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn extract_content(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::Classification {
            message: "Completion response contains no message content".to_string(),
        })
}

pub(crate) fn request_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout {
            message: format!("Completion request timed out: {}", e),
        }
    } else {
        AppError::NetworkError {
            message: format!("Completion request failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_endpoint_joins_base_url() {
        assert_eq!(
            chat_endpoint("http://localhost:1234/v1").unwrap().as_str(),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("http://localhost:1234/v1/").unwrap().as_str(),
            "http://localhost:1234/v1/chat/completions"
        );
        assert!(chat_endpoint("localhost").is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "text",
                },
            ],
            temperature: 0.7,
            max_tokens: -1,
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "text");
        assert_eq!(value["max_tokens"], -1);
    }

    #[test]
    fn test_extract_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"{\"filename\":\"a\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), r#"{"filename":"a"}"#);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(empty).is_err());
    }
}
