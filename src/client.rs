use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::ProbeConfig;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("model not found: {0}")]
    InvalidModel(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Unknown(String),
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    // Ask the backend to account cost in the response usage block.
    usage: UsageOptions,
}

#[derive(Debug, Clone, Serialize)]
struct UsageOptions {
    include: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    /// Cost in USD as accounted by the backend for this response.
    #[serde(default)]
    cost: f64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Outcome of a single completion call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated response text
    pub text: String,
    /// Cost in USD as reported by the backend (0 if not reported)
    pub cost: f64,
    /// Wall-clock time spent on the network call
    pub elapsed: Duration,
}

impl CompletionClient {
    /// Creates a client from the given backend configuration.
    pub fn new(config: &ProbeConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Sends one chat completion request and returns the response text,
    /// the backend-accounted cost, and the elapsed wall-clock time.
    ///
    /// The system message, when present, precedes the user message.
    /// Errors are returned as-is: no retry, no suppression.
    pub async fn complete(
        &self,
        model: &str,
        user_prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<Completion, ClientError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(user_prompt));

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            usage: UsageOptions { include: true },
        };

        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let start = Instant::now();

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Network(format!("request timed out: {}", e))
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => body,
            };

            return Err(match status {
                401 => ClientError::Auth(message),
                404 => ClientError::InvalidModel(model.to_string()),
                429 => ClientError::RateLimited(message),
                _ => ClientError::Api { status, message },
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("failed to parse response: {}", e)))?;

        let elapsed = start.elapsed();

        let text = body
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ClientError::Parse("no choices in response".to_string()))?;

        let cost = body.usage.map(|u| u.cost).unwrap_or(0.0);

        Ok(Completion {
            text,
            cost,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> ProbeConfig {
        ProbeConfig {
            base_url,
            api_key: Some("sk-test".to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    fn completion_body(content: &str, cost: f64) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "cost": cost}
        })
    }

    #[tokio::test]
    async fn successful_completion_returns_text_and_cost() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi", 0.0123)))
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let completion = client
            .complete("openai/gpt-4o-mini", "hello", None)
            .await
            .unwrap();

        assert_eq!(completion.text, "hi");
        assert_eq!(completion.cost, 0.0123);
        assert!(completion.elapsed > Duration::ZERO);
    }

    #[tokio::test]
    async fn system_message_precedes_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok", 0.0)))
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let completion = client
            .complete("openai/gpt-4o-mini", "hello", Some("be terse"))
            .await
            .unwrap();
        assert_eq!(completion.text, "ok");
    }

    #[tokio::test]
    async fn missing_usage_reports_zero_cost() {
        let server = MockServer::start().await;
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}]
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let completion = client
            .complete("openai/gpt-4o-mini", "hello", None)
            .await
            .unwrap();
        assert_eq!(completion.cost, 0.0);
    }

    #[tokio::test]
    async fn status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "invalid API key"}})),
            )
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let err = client
            .complete("openai/gpt-4o-mini", "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
        assert!(err.to_string().contains("invalid API key"));
    }

    #[tokio::test]
    async fn status_404_maps_to_invalid_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": {"message": "no such model"}})),
            )
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let err = client.complete("bogus/model", "hello", None).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidModel(_)));
        assert!(err.to_string().contains("bogus/model"));
    }

    #[tokio::test]
    async fn status_429_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": {"message": "slow down"}})),
            )
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let err = client
            .complete("openai/gpt-4o-mini", "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RateLimited(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = CompletionClient::new(&test_config(server.uri())).unwrap();
        let err = client
            .complete("openai/gpt-4o-mini", "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
