// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Quill
//!
//! Handles loading settings from a TOML file. Every field has a default, so
//! an empty file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::context::GLOBAL_CATEGORY;
use crate::error::{QuillError, Result};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Retry and resilience settings for backend calls
    #[serde(default)]
    pub resilience: ResilienceConfig,

    /// Ambient-context settings
    #[serde(default)]
    pub context: ContextSettings,

    /// Completion backend settings
    #[serde(default)]
    pub backend: BackendSettings,
}

/// Retry and resilience configuration for backend calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (cap for backoff)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Jitter percentage (0.0 to 1.0) for randomizing delays
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

/// Ambient-context configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Context categories resolved for every request, in order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Chat-completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum response tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate field ranges and cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.resilience.jitter) {
            return Err(QuillError::Config(format!(
                "jitter must be between 0.0 and 1.0, got {}",
                self.resilience.jitter
            )));
        }

        if self.resilience.max_delay_ms < self.resilience.base_delay_ms {
            return Err(QuillError::Config(format!(
                "max_delay_ms ({}) must be >= base_delay_ms ({})",
                self.resilience.max_delay_ms, self.resilience.base_delay_ms
            )));
        }

        if self.backend.model.is_empty() {
            return Err(QuillError::Config("backend model must not be empty".to_string()));
        }

        if self.context.categories.is_empty() {
            return Err(QuillError::Config(
                "context categories must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    16000
}

fn default_jitter() -> f64 {
    0.25
}

fn default_categories() -> Vec<String> {
    vec![GLOBAL_CATEGORY.to_string()]
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}
