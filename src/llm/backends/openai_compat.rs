// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI-compatible chat-completions backend
//!
//! Non-streaming implementation of the CompletionBackend trait against any
//! `/chat/completions` endpoint (OpenAI, OpenRouter, llama-server, vLLM).
//! Forwarded params are merged into the request body last, so callers can
//! override any default the backend sets.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::config::BackendSettings;
use crate::error::{ApiError, QuillError, Result};
use crate::llm::backend::{BackendParams, CompletionBackend};
use crate::llm::message::Message;

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI-compatible completion backend
#[derive(Debug)]
pub struct OpenAiCompatBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatBackend {
    /// Create a new backend against a chat-completions URL
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Build a backend from settings, resolving the API key from the
    /// environment variable the settings name
    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            QuillError::Config(format!(
                "No API key found. Set the {} environment variable.",
                settings.api_key_env
            ))
        })?;

        Ok(
            Self::new(api_key, settings.base_url.clone(), settings.model.clone())
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
        )
    }

    /// Set the maximum response tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the request body, merging forwarded params last
    fn build_body(&self, messages: &[Message], params: &BackendParams) -> Result<serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert("model".to_string(), serde_json::json!(self.model));
        body.insert("messages".to_string(), serde_json::to_value(messages)?);
        body.insert("max_tokens".to_string(), serde_json::json!(self.max_tokens));
        body.insert(
            "temperature".to_string(),
            serde_json::json!(self.temperature),
        );

        // Caller-forwarded params win on key collision
        for (key, value) in params {
            body.insert(key.clone(), value.clone());
        }

        Ok(serde_json::Value::Object(body))
    }

    /// Parse an error response body into our error taxonomy
    fn parse_error(&self, status: u16, body: &str) -> QuillError {
        if let Ok(error_response) = serde_json::from_str::<ChatError>(body) {
            let message = error_response.error.message;
            let code = error_response.error.code.as_deref().unwrap_or("");

            match code {
                "invalid_api_key" | "authentication_error" => {
                    return QuillError::Api(ApiError::AuthenticationFailed);
                }
                "rate_limit_exceeded" => return QuillError::Api(ApiError::RateLimited(60)),
                "context_length_exceeded" => {
                    let (current, limit) = parse_token_counts(&message);
                    return QuillError::Api(ApiError::ContextTooLong { current, limit });
                }
                "model_not_found" => return QuillError::Api(ApiError::ModelNotFound(message)),
                _ => {
                    return QuillError::Api(ApiError::ServerError { status, message });
                }
            }
        }

        match status {
            401 | 403 => QuillError::Api(ApiError::AuthenticationFailed),
            429 => QuillError::Api(ApiError::RateLimited(60)),
            404 => QuillError::Api(ApiError::ModelNotFound(self.model.clone())),
            _ => QuillError::Api(ApiError::ServerError {
                status,
                message: body.to_string(),
            }),
        }
    }

    /// Map reqwest transport failures into our error taxonomy
    fn map_transport_error(error: reqwest::Error) -> QuillError {
        if error.is_timeout() {
            QuillError::Api(ApiError::Timeout)
        } else {
            QuillError::Api(ApiError::Network(error.to_string()))
        }
    }

    async fn send(&self, messages: &[Message], params: &BackendParams) -> Result<String> {
        let body = self.build_body(messages, params)?;

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status, &body));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| QuillError::Api(ApiError::InvalidResponse(e.to_string())))?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            QuillError::Api(ApiError::InvalidResponse(
                "No choices in response".to_string(),
            ))
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        params: &BackendParams,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(QuillError::Cancelled);
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(backend = self.name(), "request cancelled in flight");
                Err(QuillError::Cancelled)
            }
            result = self.send(messages, params) => result,
        }
    }
}

/// Pull `(current, limit)` token counts out of a context-length error message
fn parse_token_counts(message: &str) -> (u32, u32) {
    let numbers: Vec<u32> = message
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|s| s.parse().ok())
        .collect();

    match numbers.as_slice() {
        [current, limit, ..] => (*current, *limit),
        [single] => (*single, 0),
        _ => (0, 0),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    error: ChatErrorBody,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    message: String,
    code: Option<String>,
}
