//! Model client boundary: request/response types, retry policy, and the
//! Anthropic Messages adapter.
//!
//! ```rust
//! use lprovider::{ContentItem, ModelResponse, ProviderId, ToolCallRequest};
//!
//! let response = ModelResponse::new(
//!     ProviderId::Anthropic,
//!     "claude-sonnet-4-20250514",
//!     vec![
//!         ContentItem::text("Let me look that up."),
//!         ContentItem::ToolCall(ToolCallRequest::new(
//!             "toolu_1",
//!             "search_course_content",
//!             serde_json::Map::new(),
//!         )),
//!     ],
//! );
//!
//! assert!(response.has_tool_calls());
//! assert_eq!(response.first_text(), Some("Let me look that up."));
//! ```

mod client;
mod credentials;
mod error;
mod model;
mod resilience;

pub mod adapters;
pub mod prelude;

pub use client::{ClientFuture, ModelClient};
pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    ContentItem, ModelRequest, ModelRequestBuilder, ModelResponse, Origin, ParameterKind,
    ParameterSpec, ProviderId, StopReason, TokenUsage, ToolCallRequest, ToolCallResult,
    ToolChoice, ToolSpec, Turn,
};
pub use resilience::{NoopOperationHooks, ProviderOperationHooks, RetryPolicy, execute_with_retry};
