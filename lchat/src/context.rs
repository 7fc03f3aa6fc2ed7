//! Append-only conversation log for one orchestration run.
//!
//! ```rust
//! use lchat::ConversationContext;
//!
//! let context = ConversationContext::new("You answer course questions.")
//!     .with_history("User: hi\nAssistant: hello");
//!
//! assert_eq!(
//!     context.system_text(),
//!     "You answer course questions.\n\nPrevious conversation:\nUser: hi\nAssistant: hello"
//! );
//! ```

use lprovider::{ContentItem, ToolCallResult, Turn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContext {
    system: String,
    history: Option<String>,
    turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            history: None,
            turns: Vec::new(),
        }
    }

    /// Prior-session summary, appended verbatim to the system text.
    pub fn with_history(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.history = (!summary.trim().is_empty()).then_some(summary);
        self
    }

    pub fn history(&self) -> Option<&str> {
        self.history.as_deref()
    }

    pub fn system_text(&self) -> String {
        match &self.history {
            Some(summary) => format!("{}\n\nPrevious conversation:\n{summary}", self.system),
            None => self.system.clone(),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, content: Vec<ContentItem>) {
        self.turns.push(Turn::assistant(content));
    }

    /// One turn for the whole round; `results` must already be in request order.
    pub fn push_tool_results(&mut self, results: Vec<ToolCallResult>) {
        self.turns.push(Turn::tool_results(results));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
