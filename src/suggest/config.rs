// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-mode configuration
//!
//! Each suggestion mode carries its own capability bundle: how to phrase the
//! system prompt, which exemplars to show, which backend to call, and what
//! to forward to it. The caller constructs both bundles; the engine only
//! reads them.

use std::sync::Arc;

use crate::llm::backend::{BackendParams, CompletionBackend};
use crate::llm::message::Message;

/// System-prompt generator: `(purpose, context_string) -> prompt text`
pub type SystemPromptFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Capability bundle for one suggestion mode
#[derive(Clone)]
pub struct ModeConfig {
    /// Generates the system message from purpose and ambient context
    pub system_prompt: SystemPromptFn,

    /// Few-shot exemplars, sent verbatim in this order
    pub few_shot: Vec<Message>,

    /// The completion backend this mode calls
    pub backend: Arc<dyn CompletionBackend>,

    /// Opaque params forwarded to the backend untouched
    pub params: BackendParams,
}

impl ModeConfig {
    /// Create a mode configuration from a prompt generator and a backend
    pub fn new(
        system_prompt: impl Fn(&str, &str) -> String + Send + Sync + 'static,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            system_prompt: Arc::new(system_prompt),
            few_shot: vec![],
            backend,
            params: BackendParams::new(),
        }
    }

    /// Set the few-shot exemplars
    pub fn with_few_shot(mut self, few_shot: Vec<Message>) -> Self {
        self.few_shot = few_shot;
        self
    }

    /// Set the forwarded backend params
    pub fn with_params(mut self, params: BackendParams) -> Self {
        self.params = params;
        self
    }
}

impl std::fmt::Debug for ModeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeConfig")
            .field("few_shot", &self.few_shot.len())
            .field("backend", &self.backend.name())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock_backend::MockBackend;

    #[test]
    fn test_mode_config_defaults() {
        let config = ModeConfig::new(|_, _| "prompt".to_string(), Arc::new(MockBackend::new()));

        assert!(config.few_shot.is_empty());
        assert!(config.params.is_empty());
        assert_eq!(config.backend.name(), "mock");
    }

    #[test]
    fn test_mode_config_builders() {
        let mut params = BackendParams::new();
        params.insert("model".to_string(), serde_json::json!("test"));

        let config = ModeConfig::new(|_, _| String::new(), Arc::new(MockBackend::new()))
            .with_few_shot(vec![Message::user("example")])
            .with_params(params);

        assert_eq!(config.few_shot.len(), 1);
        assert_eq!(config.params["model"], "test");
    }

    #[test]
    fn test_system_prompt_receives_purpose_and_context() {
        let config = ModeConfig::new(
            |purpose, context| format!("{purpose}|{context}"),
            Arc::new(MockBackend::new()),
        );

        assert_eq!((config.system_prompt)("a note", "ambient"), "a note|ambient");
    }

    #[test]
    fn test_mode_config_debug_output() {
        let config = ModeConfig::new(|_, _| String::new(), Arc::new(MockBackend::new()));
        let debug = format!("{:?}", config);
        assert!(debug.contains("ModeConfig"));
        assert!(debug.contains("mock"));
    }
}
