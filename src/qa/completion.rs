//! HTTP client for an OpenAI-style chat-completions endpoint.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Tagged failure reasons for completion requests.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Request timed out before the endpoint responded.
    #[error("Completion request timed out")]
    Timeout,
    /// Endpoint could not be reached.
    #[error("Completion endpoint unreachable: {0}")]
    Unreachable(String),
    /// Endpoint responded with a non-success status.
    #[error("Unexpected completion response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the endpoint.
        status: reqwest::StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response body did not contain `choices[0].message.content`.
    #[error("Invalid completion payload: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client posting single-message completions to a configured endpoint.
pub struct CompletionClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionClient {
    /// Construct a client for the given endpoint and model identifier.
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .user_agent("legalens/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| CompletionError::Unreachable(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
        })
    }

    /// Send `prompt` as a single user message and return the trimmed reply.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = CompletionError::UnexpectedStatus { status, body };
            tracing::warn!(error = %error, "Completion endpoint returned failure status");
            return Err(error);
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::InvalidResponse(err.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse("response carried no choices".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

fn classify_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Unreachable(err.to_string())
    }
}
