// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock completion backend for testing
//!
//! Provides a configurable mock implementation of the CompletionBackend
//! trait that can be used in unit tests without making real API calls.
//! Outcomes are consumed in order; the last one repeats once the script
//! runs out, so "fail twice then succeed" is three outcomes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, QuillError, Result};
use crate::llm::backend::{BackendParams, CompletionBackend};
use crate::llm::message::Message;

/// A scripted mock completion backend
#[derive(Clone)]
pub struct MockBackend {
    /// Backend name
    name: String,
    /// Scripted outcomes, consumed front to back
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A pre-configured outcome for the mock backend
#[derive(Clone, Debug)]
pub enum MockOutcome {
    /// Return this text
    Reply(String),
    /// Fail with a network error (retryable)
    NetworkError(String),
    /// Fail with a rate limit (retryable)
    RateLimited(u32),
    /// Fail with a server error (retryable iff 5xx)
    ServerError(u16, String),
    /// Fail with an authentication error (non-retryable)
    AuthenticationFailed,
    /// Suspend until the cancellation token fires, then resolve cancelled
    HangUntilCancelled,
}

impl MockOutcome {
    async fn resolve(self, cancel: &CancellationToken) -> Result<String> {
        match self {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::NetworkError(msg) => Err(QuillError::Api(ApiError::Network(msg))),
            MockOutcome::RateLimited(secs) => Err(QuillError::Api(ApiError::RateLimited(secs))),
            MockOutcome::ServerError(status, message) => {
                Err(QuillError::Api(ApiError::ServerError { status, message }))
            }
            MockOutcome::AuthenticationFailed => {
                Err(QuillError::Api(ApiError::AuthenticationFailed))
            }
            MockOutcome::HangUntilCancelled => {
                cancel.cancelled().await;
                Err(QuillError::Cancelled)
            }
        }
    }
}

/// A request observed by the mock backend
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The message sequence the engine sent
    pub messages: Vec<Message>,
    /// The forwarded params, untouched
    pub params: BackendParams,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend that replies with an empty string
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            outcomes: Arc::new(Mutex::new(VecDeque::from([MockOutcome::Reply(
                String::new(),
            )]))),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Create a mock backend with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut backend = Self::new();
        backend.name = name.into();
        backend
    }

    /// Set a single text reply
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_outcomes(vec![MockOutcome::Reply(text.into())])
    }

    /// Queue multiple text replies (returned in order)
    pub fn with_replies(self, texts: Vec<String>) -> Self {
        self.with_outcomes(texts.into_iter().map(MockOutcome::Reply).collect())
    }

    /// Queue arbitrary outcomes (consumed in order, last one repeats)
    pub fn with_outcomes(self, scripted: Vec<MockOutcome>) -> Self {
        let mut outcomes = self.lock_outcomes();
        outcomes.clear();
        outcomes.extend(scripted);
        drop(outcomes);
        self
    }

    /// Number of times `run` was invoked
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests observed so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        match self.recorded_requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                tracing::warn!("Mock backend request lock was poisoned, recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    fn lock_outcomes(&self) -> std::sync::MutexGuard<'_, VecDeque<MockOutcome>> {
        match self.outcomes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Mock backend outcome lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn next_outcome(&self) -> MockOutcome {
        let mut outcomes = self.lock_outcomes();
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap_or(MockOutcome::Reply(String::new()))
        } else {
            outcomes
                .front()
                .cloned()
                .unwrap_or(MockOutcome::Reply(String::new()))
        }
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        params: &BackendParams,
    ) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.recorded_requests.lock() {
            Ok(mut guard) => guard.push(RecordedRequest {
                messages: messages.to_vec(),
                params: params.clone(),
            }),
            Err(poisoned) => {
                tracing::warn!("Mock backend request lock was poisoned, recovering");
                poisoned.into_inner().push(RecordedRequest {
                    messages: messages.to_vec(),
                    params: params.clone(),
                });
            }
        }

        if cancel.is_cancelled() {
            return Err(QuillError::Cancelled);
        }

        self.next_outcome().resolve(cancel).await
    }
}
