//! Assistant-level error types and conversion helpers.
//!
//! ```rust
//! use lectern::{AssistantError, AssistantErrorKind};
//!
//! let err = AssistantError::configuration("max_results must be greater than zero");
//! assert_eq!(err.kind, AssistantErrorKind::Configuration);
//! assert!(err.to_string().contains("max_results"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use lchat::{ChatError, ChatErrorKind};
use lcourse::StoreError;
use lmemory::MemoryError;
use lprovider::{ProviderError, ProviderErrorKind};
use ltooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    Configuration,
    InvalidRequest,
    Provider,
    Timeout,
    Orchestration,
    Session,
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Configuration, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Provider, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Timeout, message).with_retryable(true)
    }

    pub fn orchestration(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Orchestration, message)
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Session, message)
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Catalog, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == AssistantErrorKind::Timeout
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AssistantError {}

impl From<ChatError> for AssistantError {
    fn from(value: ChatError) -> Self {
        let kind = match value.kind {
            ChatErrorKind::Timeout => AssistantErrorKind::Timeout,
            ChatErrorKind::Provider => AssistantErrorKind::Provider,
            ChatErrorKind::InvalidRequest => AssistantErrorKind::InvalidRequest,
            ChatErrorKind::Store | ChatErrorKind::Tooling => AssistantErrorKind::Orchestration,
        };

        AssistantError::new(kind, value.message).with_retryable(value.retryable)
    }
}

impl From<ProviderError> for AssistantError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Timeout => AssistantErrorKind::Timeout,
            ProviderErrorKind::Authentication => AssistantErrorKind::Configuration,
            _ => AssistantErrorKind::Provider,
        };

        AssistantError::new(kind, value.to_string()).with_retryable(value.retryable)
    }
}

impl From<MemoryError> for AssistantError {
    fn from(value: MemoryError) -> Self {
        AssistantError::session(value.to_string())
    }
}

/// Tool errors only reach this layer from registration, so they are
/// configuration faults.
impl From<ToolError> for AssistantError {
    fn from(value: ToolError) -> Self {
        AssistantError::configuration(value.to_string())
    }
}

impl From<StoreError> for AssistantError {
    fn from(value: StoreError) -> Self {
        AssistantError::catalog(value.to_string())
    }
}
