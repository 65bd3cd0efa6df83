// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Completion backend trait
//!
//! Defines the abstraction layer for completion backends. The engine only
//! ever talks to this trait; transport is the implementation's concern.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::llm::message::Message;

/// Opaque parameters forwarded to the backend untouched (model, temperature,
/// provider-specific knobs). The engine never reads them.
pub type BackendParams = serde_json::Map<String, serde_json::Value>;

/// Main trait for completion backends
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Get the backend name (e.g., "openai-compat", "mock")
    fn name(&self) -> &str;

    /// Run a single non-streaming completion over the given message
    /// sequence and return the suggested text verbatim.
    ///
    /// Implementations must observe `cancel` at their suspension points and
    /// resolve with [`crate::QuillError::Cancelled`] once it fires.
    async fn run(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        params: &BackendParams,
    ) -> Result<String>;
}
