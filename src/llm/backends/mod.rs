// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Bundled completion backend implementations

pub mod openai_compat;

pub use openai_compat::OpenAiCompatBackend;
