//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use lprovider::{ProviderError, ProviderErrorKind};
use ltooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    Provider,
    Timeout,
    Store,
    Tooling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Timeout, message).with_retryable(true)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ChatErrorKind::Timeout
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Timeout => ChatErrorKind::Timeout,
            _ => ChatErrorKind::Provider,
        };

        ChatError::new(kind, value.to_string()).with_retryable(value.retryable)
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        ChatError::tooling(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_timeout_maps_to_timeout_kind() {
        let error = ChatError::from(ProviderError::timeout("no response in 60s"));
        assert!(error.is_timeout());
        assert!(error.retryable);

        let error = ChatError::from(ProviderError::authentication("invalid x-api-key"));
        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert!(!error.retryable);
        assert!(error.message.contains("invalid x-api-key"));
    }
}
