use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::{AttemptError, RecommendError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_RETRIES: usize = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Minimal client for OpenAI-compatible chat-completion endpoints.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    max_retries: usize,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn set_max_retries(&mut self, max_retries: usize) {
        self.max_retries = max_retries;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a chat-completion body and return the decoded JSON response.
    ///
    /// Server errors and timeouts are retried with exponential backoff. Quota
    /// and rate-limit answers are returned at once as `QuotaExceeded`.
    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RecommendError::config(format!("Failed to build HTTP client: {err}")))?;

        let request_url = build_chat_url(&self.base_url);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let outcome = tokio::time::timeout(timeout, self.send_once(&client, &request_url, body))
                .await
                .unwrap_or_else(|_| {
                    Err(AttemptError::transient(RecommendError::Timeout(format!(
                        "chat completion exceeded {}s",
                        timeout.as_secs()
                    ))))
                });

            match outcome {
                Ok(response) => return Ok(response),
                Err(failure) if failure.retryable && attempt < self.max_retries => {
                    tracing::warn!(attempt = attempt + 1, error = %failure.error, "retrying chat completion");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff *= 2;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn send_once(
        &self,
        client: &reqwest::Client,
        url: &str,
        body: &Value,
    ) -> std::result::Result<Value, AttemptError> {
        let response = client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(AttemptError::from_status(
                status,
                classify_failure(status, &response_text),
            ));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            AttemptError::fatal(RecommendError::MalformedResponse(format!(
                "chat completion is not JSON: {err}"
            )))
        })?;

        if let Some(error) = response_json.get("error") {
            return Err(AttemptError::fatal(classify_failure(status, &error.to_string())));
        }

        Ok(response_json)
    }
}

/// Sort a failed provider answer into an error kind.
///
/// A 429 status or an `insufficient_quota`/`rate_limit` code anywhere in the
/// body counts as quota exhaustion, whatever the status.
pub fn classify_failure(status: StatusCode, body: &str) -> RecommendError {
    let lowered = body.to_ascii_lowercase();
    let message = extract_api_message(body).unwrap_or_else(|| body.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS
        || lowered.contains("insufficient_quota")
        || lowered.contains("rate_limit")
    {
        return RecommendError::QuotaExceeded(format!("HTTP {status}: {message}"));
    }

    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        return RecommendError::Timeout(format!("HTTP {status}: {message}"));
    }

    RecommendError::ProviderUnavailable(format!("HTTP {status}: {message}"))
}

/// Text content of the first choice of a chat-completion response.
pub fn message_content(response: &Value) -> Result<&str> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RecommendError::MalformedResponse(
                "chat completion has no message content".to_string(),
            )
        })
}

fn extract_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error").unwrap_or(&value);
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn transport_error(err: reqwest::Error) -> AttemptError {
    AttemptError::transient(if err.is_timeout() {
        RecommendError::Timeout(format!("HTTP request timed out: {err}"))
    } else {
        RecommendError::ProviderUnavailable(format!("HTTP request failed: {err}"))
    })
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    /// Ask for a bare JSON object answer.
    pub fn json_object(self) -> Self {
        self.with_response_format(json!({ "type": "json_object" }))
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
