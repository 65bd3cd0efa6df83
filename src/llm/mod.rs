// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM module for Quill
//!
//! Provides the completion backend abstraction, retry policy, and the
//! bundled backend implementations.

pub mod backend;
pub mod backends;
pub mod message;
pub mod mock_backend;
pub mod retry;

pub use backend::*;
pub use message::*;
pub use retry::*;
