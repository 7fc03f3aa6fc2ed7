//! History message types and the rolling-window formatter.

use crate::error::MemoryError;

/// Number of exchanges kept per session unless configured otherwise.
pub const DEFAULT_MAX_HISTORY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }

    pub fn parse(value: &str) -> Result<Self, MemoryError> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(MemoryError::storage(format!(
                "unknown history message role '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub role: MessageRole,
    pub content: String,
}

impl HistoryMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn exchange(query: &str, answer: &str) -> Vec<Self> {
        vec![Self::user(query), Self::assistant(answer)]
    }
}

/// Maximum number of stored messages for a window of `max_history` exchanges.
pub fn message_capacity(max_history: usize) -> usize {
    max_history.saturating_mul(2)
}

/// Drops the oldest messages so at most `message_capacity(max_history)` remain.
pub fn trim_to_window(messages: &mut Vec<HistoryMessage>, max_history: usize) {
    let capacity = message_capacity(max_history);
    if messages.len() > capacity {
        let excess = messages.len() - capacity;
        messages.drain(..excess);
    }
}

/// Renders messages as `User: ...` / `Assistant: ...` lines.
///
/// Returns `None` when there is nothing to render, so callers can skip the
/// history section entirely.
///
/// ```rust
/// use lmemory::{HistoryMessage, format_history};
///
/// let rendered = format_history(&HistoryMessage::exchange("What is MCP?", "A protocol."));
/// assert_eq!(rendered.as_deref(), Some("User: What is MCP?\nAssistant: A protocol."));
/// assert_eq!(format_history(&[]), None);
/// ```
pub fn format_history(messages: &[HistoryMessage]) -> Option<String> {
    if messages.is_empty() {
        return None;
    }

    let lines = messages
        .iter()
        .map(|message| format!("{}: {}", message.role.label(), message.content))
        .collect::<Vec<_>>();
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_keeps_latest_messages() {
        let mut messages = (0..7)
            .map(|index| HistoryMessage::user(format!("m{index}")))
            .collect::<Vec<_>>();

        trim_to_window(&mut messages, 2);

        let contents = messages
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>();
        assert_eq!(contents, ["m3", "m4", "m5", "m6"]);
    }

    #[test]
    fn zero_window_keeps_nothing() {
        let mut messages = HistoryMessage::exchange("q", "a");
        trim_to_window(&mut messages, 0);
        assert!(messages.is_empty());
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert_eq!(MessageRole::parse("assistant"), Ok(MessageRole::Assistant));
        let error = MessageRole::parse("system").expect_err("unknown role should fail");
        assert!(error.message.contains("system"));
    }
}
