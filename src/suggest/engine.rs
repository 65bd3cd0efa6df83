// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Suggestion engine
//!
//! Owns the two mode configurations and drives a single suggestion request:
//! resolve ambient context, dispatch on the selection, build the message
//! sequence, and call the mode's backend under the retry policy. Each call
//! is independent and stateless; overlapping requests are the caller's
//! concern.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::context::ContextProvider;
use crate::error::Result;
use crate::llm::message::Message;
use crate::llm::retry::{with_retry, RetryConfig};
use crate::suggest::builder::{editing_messages, insertion_messages};
use crate::suggest::config::ModeConfig;
use crate::suggest::{EditorState, SuggestionMode};

/// Engine producing one text suggestion per call
pub struct SuggestionEngine {
    /// What the editing surface is for, threaded into every system prompt
    purpose: String,
    /// Insertion-mode capability bundle
    insertion: ModeConfig,
    /// Editing-mode capability bundle
    editing: ModeConfig,
    /// Ambient-context capability
    context: Arc<dyn ContextProvider>,
    /// Context categories resolved per request; None means provider default
    categories: Option<Vec<String>>,
    /// Retry policy for backend calls
    retry: RetryConfig,
}

impl SuggestionEngine {
    /// Create an engine from per-mode configurations and a context provider
    pub fn new(
        purpose: impl Into<String>,
        insertion: ModeConfig,
        editing: ModeConfig,
        context: Arc<dyn ContextProvider>,
    ) -> Self {
        Self {
            purpose: purpose.into(),
            insertion,
            editing,
            context,
            categories: None,
            retry: RetryConfig::default(),
        }
    }

    /// Set the context categories resolved for every request
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Produce one suggestion for the given editor snapshot.
    ///
    /// An empty selection takes the insertion path; anything else takes the
    /// editing path. Returns the backend's response verbatim, or
    /// [`crate::QuillError::Cancelled`] once `cancel` fires.
    pub async fn suggest(
        &self,
        state: &EditorState,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let context_string = self.context.context_string(self.categories.as_deref());
        let mode = state.mode();

        let (config, messages) = match mode {
            SuggestionMode::Insertion => {
                let messages =
                    insertion_messages(&self.insertion, &self.purpose, &context_string, state, prompt);
                (&self.insertion, messages)
            }
            SuggestionMode::Editing => {
                let messages =
                    editing_messages(&self.editing, &self.purpose, &context_string, state, prompt);
                (&self.editing, messages)
            }
        };

        tracing::debug!(
            mode = %mode,
            backend = config.backend.name(),
            messages = messages.len(),
            "dispatching suggestion request"
        );

        self.invoke(config, &messages, cancel).await
    }

    /// Call the mode's backend under the retry policy.
    ///
    /// Returns the backend's string unmodified; no trimming or validation.
    async fn invoke(
        &self,
        config: &ModeConfig,
        messages: &[Message],
        cancel: &CancellationToken,
    ) -> Result<String> {
        with_retry(
            || config.backend.run(cancel, messages, &config.params),
            Some(self.retry.clone()),
            cancel,
            "completion",
        )
        .await
    }
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("purpose", &self.purpose)
            .field("insertion", &self.insertion)
            .field("editing", &self.editing)
            .field("categories", &self.categories)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CategoryContext;
    use crate::llm::mock_backend::MockBackend;

    fn engine_with(insertion: MockBackend, editing: MockBackend) -> SuggestionEngine {
        let context = CategoryContext::new().with_slice("global", "ambient");
        SuggestionEngine::new(
            "a test document",
            ModeConfig::new(
                |purpose, ctx| format!("insert for {purpose} [{ctx}]"),
                Arc::new(insertion),
            ),
            ModeConfig::new(
                |purpose, ctx| format!("edit for {purpose} [{ctx}]"),
                Arc::new(editing),
            ),
            Arc::new(context),
        )
    }

    #[tokio::test]
    async fn test_insertion_path_uses_insertion_backend() {
        let insertion = MockBackend::new().with_reply("inserted");
        let editing = MockBackend::new().with_reply("edited");
        let engine = engine_with(insertion.clone(), editing.clone());
        let cancel = CancellationToken::new();

        let state = EditorState::new("Hello ", "!", "");
        let result = engine.suggest(&state, "continue", &cancel).await.unwrap();

        assert_eq!(result, "inserted");
        assert_eq!(insertion.calls(), 1);
        assert_eq!(editing.calls(), 0);
    }

    #[tokio::test]
    async fn test_editing_path_uses_editing_backend() {
        let insertion = MockBackend::new().with_reply("inserted");
        let editing = MockBackend::new().with_reply("edited");
        let engine = engine_with(insertion.clone(), editing.clone());
        let cancel = CancellationToken::new();

        let state = EditorState::new("Hello ", "!", "Hello");
        let result = engine.suggest(&state, "rewrite", &cancel).await.unwrap();

        assert_eq!(result, "edited");
        assert_eq!(insertion.calls(), 0);
        assert_eq!(editing.calls(), 1);
    }

    #[tokio::test]
    async fn test_system_prompt_sees_resolved_context() {
        let insertion = MockBackend::new().with_reply("ok");
        let engine = engine_with(insertion.clone(), MockBackend::new());
        let cancel = CancellationToken::new();

        engine
            .suggest(&EditorState::default(), "go", &cancel)
            .await
            .unwrap();

        let requests = insertion.requests();
        assert_eq!(
            requests[0].messages[0].content,
            "insert for a test document [ambient]"
        );
    }

    #[tokio::test]
    async fn test_custom_categories_resolved() {
        let insertion = MockBackend::new().with_reply("ok");
        let context = CategoryContext::new()
            .with_slice("global", "global slice")
            .with_slice("style", "style slice");
        let engine = SuggestionEngine::new(
            "doc",
            ModeConfig::new(|_, ctx| ctx.to_string(), Arc::new(insertion.clone())),
            ModeConfig::new(|_, ctx| ctx.to_string(), Arc::new(MockBackend::new())),
            Arc::new(context),
        )
        .with_categories(vec!["style".to_string()]);
        let cancel = CancellationToken::new();

        engine
            .suggest(&EditorState::default(), "go", &cancel)
            .await
            .unwrap();

        assert_eq!(insertion.requests()[0].messages[0].content, "style slice");
    }

    #[tokio::test]
    async fn test_forwarded_params_reach_backend() {
        let insertion = MockBackend::new().with_reply("ok");
        let mut params = crate::llm::backend::BackendParams::new();
        params.insert("temperature".to_string(), serde_json::json!(0.2));

        let engine = SuggestionEngine::new(
            "doc",
            ModeConfig::new(|_, _| String::new(), Arc::new(insertion.clone()))
                .with_params(params),
            ModeConfig::new(|_, _| String::new(), Arc::new(MockBackend::new())),
            Arc::new(CategoryContext::new()),
        );
        let cancel = CancellationToken::new();

        engine
            .suggest(&EditorState::default(), "go", &cancel)
            .await
            .unwrap();

        assert_eq!(insertion.requests()[0].params["temperature"], 0.2);
    }
}
