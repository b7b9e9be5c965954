//! Secondary provider: Hugging Face Inference API single-prompt text generation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AnswerProvider, ProviderError};
use crate::config::env_nonempty;

const API_BASE: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_NEW_TOKENS: u32 = 512;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Parameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
struct Token(String);

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct HuggingFaceProvider {
    http: Client,
    token: Token,
    model: String,
    base_url: String,
}

impl HuggingFaceProvider {
    /// Reads `HF_API_TOKEN` and optional `HF_MODEL`.
    pub fn from_env(http: Client) -> Option<Self> {
        let token = env_nonempty("HF_API_TOKEN")?;
        let model = env_nonempty("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Some(Self {
            http,
            token: Token(token),
            model,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            token: Token("test-token".to_string()),
            model: "test/model".to_string(),
            base_url: base_url.to_string(),
        }
    }
}

impl AnswerProvider for HuggingFaceProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/{}", self.base_url, self.model);

        let request = GenerateRequest {
            inputs: prompt,
            parameters: Parameters {
                max_new_tokens: MAX_NEW_TOKENS,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token.0)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Hugging Face API rate limited");
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if let Ok(body) = serde_json::from_str::<ErrorBody>(&text)
                && let Some(error) = body.error
            {
                error
            } else {
                let snippet = if text.len() > 200 { &text[..200] } else { &text };
                format!("HTTP {status}: {snippet}")
            };
            warn!(status = %status, "Hugging Face API error");
            return Err(ProviderError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let generations: Vec<Generation> = response.json().await?;
        let answer = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        debug!(model = %self.model, "hugging face completion ok");
        Ok(answer)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn completion_returns_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "  Drink fluids and rest. [2]  "}
            ])))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::with_base_url(Client::new(), &server.uri());
        let answer = provider.complete("prompt").await.unwrap();
        assert_eq!(answer, "Drink fluids and rest. [2]");
    }

    #[tokio::test]
    async fn http_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::with_base_url(Client::new(), &server.uri());
        let result = provider.complete("prompt").await;
        assert!(matches!(result, Err(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn error_body_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model is currently loading"
            })))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::with_base_url(Client::new(), &server.uri());
        match provider.complete("prompt").await {
            Err(ProviderError::Api { code: 503, message }) => {
                assert_eq!(message, "Model is currently loading");
            }
            other => panic!("expected Api(503), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_generation_list_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::with_base_url(Client::new(), &server.uri());
        let result = provider.complete("prompt").await;
        assert!(matches!(result, Err(ProviderError::EmptyCompletion)));
    }
}
