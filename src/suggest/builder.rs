// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Message-sequence builders
//!
//! Pure functions that assemble the per-mode conversation sent to the
//! backend. Ordering is a hard contract: position is what tells the backend
//! which fragment is which. Insertion mode lists the text after the cursor
//! before the text before it; editing mode goes before / selection / after.
//! The backends' prompt shapes rely on these exact orders.

use crate::llm::message::Message;
use crate::suggest::config::ModeConfig;
use crate::suggest::EditorState;

/// Name of the user message carrying text preceding the cursor
pub const TEXT_BEFORE_CURSOR: &str = "TextBeforeCursor";
/// Name of the user message carrying text following the cursor
pub const TEXT_AFTER_CURSOR: &str = "TextAfterCursor";
/// Name of the user message carrying the selected text
pub const TEXT_TO_EDIT: &str = "TextToEdit";
/// Name of the user message carrying the caller's insertion instruction
pub const INSERTION_PROMPT: &str = "InsertionPrompt";
/// Name of the user message carrying the caller's editing instruction
pub const EDITING_PROMPT: &str = "EditingPrompt";

/// Build the insertion-mode message sequence
///
/// Order: system, few-shot exemplars, TextAfterCursor, TextBeforeCursor,
/// InsertionPrompt.
pub fn insertion_messages(
    config: &ModeConfig,
    purpose: &str,
    context_string: &str,
    state: &EditorState,
    prompt: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(config.few_shot.len() + 4);

    messages.push(Message::system((config.system_prompt)(
        purpose,
        context_string,
    )));
    messages.extend(config.few_shot.iter().cloned());
    messages.push(Message::named(TEXT_AFTER_CURSOR, &state.text_after_cursor));
    messages.push(Message::named(
        TEXT_BEFORE_CURSOR,
        &state.text_before_cursor,
    ));
    messages.push(Message::named(INSERTION_PROMPT, prompt));

    messages
}

/// Build the editing-mode message sequence
///
/// Order: system, few-shot exemplars, TextBeforeCursor, TextToEdit,
/// TextAfterCursor, EditingPrompt.
pub fn editing_messages(
    config: &ModeConfig,
    purpose: &str,
    context_string: &str,
    state: &EditorState,
    prompt: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(config.few_shot.len() + 5);

    messages.push(Message::system((config.system_prompt)(
        purpose,
        context_string,
    )));
    messages.extend(config.few_shot.iter().cloned());
    messages.push(Message::named(
        TEXT_BEFORE_CURSOR,
        &state.text_before_cursor,
    ));
    messages.push(Message::named(TEXT_TO_EDIT, &state.selected_text));
    messages.push(Message::named(TEXT_AFTER_CURSOR, &state.text_after_cursor));
    messages.push(Message::named(EDITING_PROMPT, prompt));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Role;
    use crate::llm::mock_backend::MockBackend;
    use std::sync::Arc;

    fn config_with_few_shot(count: usize) -> ModeConfig {
        let few_shot = (0..count)
            .map(|i| Message::user(format!("exemplar {i}")))
            .collect();
        ModeConfig::new(
            |purpose, context| format!("You help with {purpose}. Context: {context}"),
            Arc::new(MockBackend::new()),
        )
        .with_few_shot(few_shot)
    }

    fn names(messages: &[Message]) -> Vec<Option<&str>> {
        messages.iter().map(|m| m.name.as_deref()).collect()
    }

    #[test]
    fn test_insertion_sequence_shape() {
        let config = config_with_few_shot(2);
        let state = EditorState::new("Hello ", "!", "");

        let messages = insertion_messages(&config, "a greeting", "ctx", &state, "continue");

        // 1 system + 2 few-shot + 3 fixed user messages
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            names(&messages[3..]),
            vec![
                Some(TEXT_AFTER_CURSOR),
                Some(TEXT_BEFORE_CURSOR),
                Some(INSERTION_PROMPT)
            ]
        );
    }

    #[test]
    fn test_insertion_after_precedes_before() {
        let config = config_with_few_shot(0);
        let state = EditorState::new("before text", "after text", "");

        let messages = insertion_messages(&config, "p", "c", &state, "go");

        assert_eq!(messages[1].name.as_deref(), Some(TEXT_AFTER_CURSOR));
        assert_eq!(messages[1].content, "after text");
        assert_eq!(messages[2].name.as_deref(), Some(TEXT_BEFORE_CURSOR));
        assert_eq!(messages[2].content, "before text");
    }

    #[test]
    fn test_insertion_system_message_content() {
        let config = config_with_few_shot(0);
        let state = EditorState::default();

        let messages = insertion_messages(&config, "a blog post", "tone: dry", &state, "go");

        assert_eq!(
            messages[0].content,
            "You help with a blog post. Context: tone: dry"
        );
        assert_eq!(messages[0].name, None);
    }

    #[test]
    fn test_insertion_ends_with_prompt() {
        let config = config_with_few_shot(3);
        let state = EditorState::new("Hello ", "!", "");

        let messages = insertion_messages(&config, "p", "c", &state, "continue");

        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.name.as_deref(), Some(INSERTION_PROMPT));
        assert_eq!(last.content, "continue");
    }

    #[test]
    fn test_insertion_empty_fields_produce_empty_contents() {
        let config = config_with_few_shot(0);
        let state = EditorState::default();

        let messages = insertion_messages(&config, "p", "", &state, "");

        // Empty strings are valid contents, never dropped
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "");
        assert_eq!(messages[2].content, "");
        assert_eq!(messages[3].content, "");
    }

    #[test]
    fn test_editing_sequence_shape() {
        let config = config_with_few_shot(2);
        let state = EditorState::new("Hello ", "!", "world");

        let messages = editing_messages(&config, "a greeting", "ctx", &state, "make it formal");

        // 1 system + 2 few-shot + 4 fixed user messages
        assert_eq!(messages.len(), 7);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            names(&messages[3..]),
            vec![
                Some(TEXT_BEFORE_CURSOR),
                Some(TEXT_TO_EDIT),
                Some(TEXT_AFTER_CURSOR),
                Some(EDITING_PROMPT)
            ]
        );
    }

    #[test]
    fn test_editing_carries_selection() {
        let config = config_with_few_shot(0);
        let state = EditorState::new("Hello ", "!", "world");

        let messages = editing_messages(&config, "p", "c", &state, "rewrite");

        assert_eq!(messages[2].name.as_deref(), Some(TEXT_TO_EDIT));
        assert_eq!(messages[2].content, "world");
        assert_eq!(messages.last().unwrap().content, "rewrite");
    }

    #[test]
    fn test_few_shot_passed_verbatim_in_order() {
        let config = config_with_few_shot(3);
        let state = EditorState::new("a", "b", "");

        let messages = insertion_messages(&config, "p", "c", &state, "go");

        for (i, message) in messages[1..4].iter().enumerate() {
            assert_eq!(message.content, format!("exemplar {i}"));
        }
    }

    #[test]
    fn test_builders_are_idempotent() {
        let config = config_with_few_shot(2);
        let state = EditorState::new("Hello ", "!", "world");

        let first = editing_messages(&config, "p", "ctx", &state, "rewrite");
        let second = editing_messages(&config, "p", "ctx", &state, "rewrite");
        assert_eq!(first, second);

        let first = insertion_messages(&config, "p", "ctx", &state, "go");
        let second = insertion_messages(&config, "p", "ctx", &state, "go");
        assert_eq!(first, second);
    }
}
