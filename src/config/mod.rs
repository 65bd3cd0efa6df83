// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration for Quill

pub mod settings;

pub use settings::{BackendSettings, ContextSettings, ResilienceConfig, Settings};
