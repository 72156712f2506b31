// Claude API client using reqwest.
//
// Sends one non-streaming request to the Anthropic Messages API and returns
// the concatenated text content. Quota exhaustion is a distinct error variant
// because the caller downgrades it to a raw-data report instead of aborting.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error calling the messages API: {source}")]
    Network { source: reqwest::Error },

    #[error("messages API quota exhausted: {message}")]
    QuotaExhausted { message: String },

    #[error("messages API returned {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    #[error("could not parse messages API response: {message}")]
    Decode { message: String },
}

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Non-streaming Claude Messages API client.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeClient {
    /// Create a new client with the given API key and model identifier.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, ANTHROPIC_API_URL.to_string())
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Send one message and return the response text.
    pub async fn complete(
        &self,
        system: &str,
        user_content: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "system": system,
            "messages": [{ "role": "user", "content": user_content }]
        });

        let response = self
            .http
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        if !status.is_success() {
            let (error_type, message) = parse_error(&text);
            if is_quota_exhausted(status, error_type.as_deref()) {
                return Err(LlmError::QuotaExhausted { message });
            }
            return Err(LlmError::Api { status, message });
        }

        parse_message_text(&text).ok_or_else(|| LlmError::Decode {
            message: "response had no text content block".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Response JSON parsing helpers
// ---------------------------------------------------------------------------

/// Whether an error response means the account is out of capacity rather
/// than the request being wrong.
fn is_quota_exhausted(status: StatusCode, error_type: Option<&str>) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || matches!(error_type, Some("rate_limit_error" | "overloaded_error"))
}

/// Extract and concatenate all text content blocks from a messages response.
///
/// Expected shape: `{ "content": [ { "type": "text", "text": "..." }, ... ] }`
pub(crate) fn parse_message_text(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    let blocks = v.get("content")?.as_array()?;
    let mut text = String::new();
    for block in blocks {
        if block.get("type").and_then(Value::as_str) == Some("text") {
            if let Some(chunk) = block.get("text").and_then(Value::as_str) {
                text.push_str(chunk);
            }
        }
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract `(error.type, error.message)` from an error response body.
///
/// Expected shape: `{ "error": { "type": "...", "message": "..." } }`.
/// Unparseable bodies fall back to the raw body as the message.
pub(crate) fn parse_error(data: &str) -> (Option<String>, String) {
    let parsed: Option<Value> = serde_json::from_str(data).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let error_type = error
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| data.trim().to_string());
    (error_type, message)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
