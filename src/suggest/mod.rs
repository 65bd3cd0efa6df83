// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Suggestion core
//!
//! Everything between the host surface and the completion backend: the
//! cursor-relative editor snapshot, the per-mode prompt assembly, and the
//! engine that dispatches one suggestion request.

pub mod builder;
pub mod config;
pub mod engine;

pub use config::{ModeConfig, SystemPromptFn};
pub use engine::SuggestionEngine;

/// Snapshot of the editing surface at the moment a suggestion is requested
///
/// Created fresh per request by the caller and immutable for its duration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    /// Text preceding the cursor (or the selection start)
    pub text_before_cursor: String,
    /// Text following the cursor (or the selection end)
    pub text_after_cursor: String,
    /// Selected text; empty means no selection
    pub selected_text: String,
}

/// Which path a suggestion request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    /// No selection: suggest text to insert at the cursor
    Insertion,
    /// Selection present: suggest a rewrite of the selected text
    Editing,
}

impl EditorState {
    /// Create a new editor snapshot
    pub fn new(
        text_before_cursor: impl Into<String>,
        text_after_cursor: impl Into<String>,
        selected_text: impl Into<String>,
    ) -> Self {
        Self {
            text_before_cursor: text_before_cursor.into(),
            text_after_cursor: text_after_cursor.into(),
            selected_text: selected_text.into(),
        }
    }

    /// Mode this snapshot dispatches to: an empty selection means
    /// insertion, anything else means editing.
    pub fn mode(&self) -> SuggestionMode {
        if self.selected_text.is_empty() {
            SuggestionMode::Insertion
        } else {
            SuggestionMode::Editing
        }
    }
}

impl std::fmt::Display for SuggestionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionMode::Insertion => write!(f, "insertion"),
            SuggestionMode::Editing => write!(f, "editing"),
        }
    }
}
