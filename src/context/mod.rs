// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Ambient-context capability
//!
//! The engine injects an ambient context string into each system prompt.
//! Where that string comes from (document metadata, project state, user
//! profile) is the host's concern; the engine only depends on the
//! `ContextProvider` trait and resolves it once per request.

use std::collections::HashMap;

/// Category every provider is expected to understand
pub const GLOBAL_CATEGORY: &str = "global";

/// Capability that resolves named context categories into one string
pub trait ContextProvider: Send + Sync {
    /// Resolve the requested categories into a single context string.
    ///
    /// `None` means "use the defaults", which is the single
    /// [`GLOBAL_CATEGORY`]. Returning an empty string is valid.
    fn context_string(&self, categories: Option<&[String]>) -> String;
}

/// Context provider backed by an in-memory category map
///
/// Requested slices are joined with blank lines in the requested order;
/// categories with no slice contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct CategoryContext {
    slices: HashMap<String, String>,
}

impl CategoryContext {
    /// Create an empty context map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slice for a category, replacing any previous value
    pub fn insert(&mut self, category: impl Into<String>, slice: impl Into<String>) {
        self.slices.insert(category.into(), slice.into());
    }

    /// Builder-style variant of [`CategoryContext::insert`]
    pub fn with_slice(mut self, category: impl Into<String>, slice: impl Into<String>) -> Self {
        self.insert(category, slice);
        self
    }
}

impl ContextProvider for CategoryContext {
    fn context_string(&self, categories: Option<&[String]>) -> String {
        let default = [GLOBAL_CATEGORY.to_string()];
        let requested = categories.unwrap_or(&default);

        requested
            .iter()
            .filter_map(|category| self.slices.get(category))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
