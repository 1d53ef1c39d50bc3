//! HTTP client for the model serving endpoint.
//!
//! One chat call per checklist item: bearer-authenticated POST with a single
//! user message, per-request timeout, lenient decoding of the response
//! content (plain string or multi-part array).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Serving endpoint error {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Failed to parse endpoint response: {0}")]
    ResponseParsing(String),
}

/// Per-request sampling and timeout parameters. Verification and checklist
/// generation use different settings against the same endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

pub struct LlmEndpointClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl LlmEndpointClient {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Send one prompt as a single user message and return the assistant
    /// content as text.
    pub async fn chat(
        &self,
        token: &str,
        prompt: &str,
        options: ChatOptions,
    ) -> Result<String, EndpointError> {
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(token)
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EndpointError::Timeout(options.timeout_secs)
                } else if e.is_connect() {
                    EndpointError::Http(format!("Connection failed: {e}"))
                } else {
                    EndpointError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EndpointError::ResponseParsing(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or(Value::Null);

        Ok(content_to_text(content))
    }
}

/// The endpoint returns `content` either as a plain string or as a
/// multi-part array of `{type, text}` parts; only the first text part
/// matters.
fn content_to_text(content: Value) -> String {
    match content {
        Value::String(s) => s,
        Value::Array(parts) => parts
            .iter()
            .find(|p| p.get("type").and_then(Value::as_str) == Some("text"))
            .and_then(|p| p.get("text").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_content_passes_through() {
        assert_eq!(content_to_text(json!("hello")), "hello");
    }

    #[test]
    fn multipart_content_takes_first_text_part() {
        let content = json!([
            {"type": "reasoning", "text": "thinking..."},
            {"type": "text", "text": "the answer"},
            {"type": "text", "text": "ignored second part"}
        ]);
        assert_eq!(content_to_text(content), "the answer");
    }

    #[test]
    fn missing_or_odd_content_yields_empty() {
        assert_eq!(content_to_text(Value::Null), "");
        assert_eq!(content_to_text(json!(42)), "");
        assert_eq!(content_to_text(json!([{"type": "image"}])), "");
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "check this",
            }],
            max_tokens: 5000,
            temperature: 0.1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "check this");
        assert_eq!(json["max_tokens"], 5000);
        assert_eq!(json["temperature"], 0.1);
    }
}
