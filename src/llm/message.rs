// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Message types for LLM interactions
//!
//! Defines the message structures sent to completion backends. A suggestion
//! request is a flat, ordered sequence of messages; position carries the
//! meaning, so messages have no identity of their own.

use serde::{Deserialize, Serialize};

/// A message in a suggestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Optional name labelling what this message carries
    /// (e.g. "TextBeforeCursor")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Content of the message; empty is valid and common
    pub content: String,
}

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// User-supplied content
    User,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            name: None,
            content: content.into(),
        }
    }

    /// Create a new unnamed user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            name: None,
            content: content.into(),
        }
    }

    /// Create a named user message
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            name: Some(name.into()),
            content: content.into(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_system_creation() {
        let message = Message::system("You complete text.");

        assert_eq!(message.role, Role::System);
        assert_eq!(message.name, None);
        assert_eq!(message.content, "You complete text.");
    }

    #[test]
    fn test_message_user_creation() {
        let message = Message::user("Hello, world!");

        assert_eq!(message.role, Role::User);
        assert_eq!(message.name, None);
        assert_eq!(message.content, "Hello, world!");
    }

    #[test]
    fn test_message_named_creation() {
        let message = Message::named("TextBeforeCursor", "Hello ");

        assert_eq!(message.role, Role::User);
        assert_eq!(message.name.as_deref(), Some("TextBeforeCursor"));
        assert_eq!(message.content, "Hello ");
    }

    #[test]
    fn test_message_empty_content_is_valid() {
        let message = Message::named("TextAfterCursor", "");
        assert_eq!(message.content, "");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_message_serialization_with_name() {
        let message = Message::named("InsertionPrompt", "continue");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["name"], "InsertionPrompt");
        assert_eq!(json["content"], "continue");
    }

    #[test]
    fn test_message_serialization_omits_absent_name() {
        let message = Message::system("instructions");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "system");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_message_deserialization() {
        let json = r#"{"role":"user","name":"TextToEdit","content":"Hello"}"#;
        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message, Message::named("TextToEdit", "Hello"));
    }
}
