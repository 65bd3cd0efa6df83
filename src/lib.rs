// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Quill - AI text suggestions for editor surfaces.
//!
//! This crate turns cursor-relative editor context into a single suggested
//! string: an insertion when nothing is selected, an edit of the selection
//! otherwise. The host surface (textarea, TUI pane, editor widget) owns
//! rendering and keystrokes; Quill owns prompt assembly, backend invocation,
//! retry, and cancellation.
//!
//! Architecture highlights:
//! - `suggest`: editor state, per-mode message builders, the engine that
//!   dispatches between insertion and editing
//! - `llm`: completion backend abstraction, retry policy, the bundled
//!   OpenAI-compatible HTTP backend, and a scriptable mock for tests
//! - `context`: ambient-context provider capability
//! - `config`: TOML-backed settings (resilience, context, backend)

pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod suggest;

pub use error::{QuillError, Result};
pub use suggest::{EditorState, ModeConfig, SuggestionEngine, SuggestionMode};
