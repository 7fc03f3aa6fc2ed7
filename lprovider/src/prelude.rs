//! Common `lprovider` imports for downstream crates.

pub use crate::{
    ContentItem, ModelClient, ModelRequest, ModelRequestBuilder, ModelResponse,
    NoopOperationHooks, Origin, ParameterKind, ParameterSpec, ProviderError, ProviderErrorKind,
    ProviderId, ProviderOperationHooks, RetryPolicy, StopReason, TokenUsage, ToolCallRequest,
    ToolCallResult, ToolChoice, ToolSpec, Turn, execute_with_retry,
};
pub use lcommon::{BoxFuture, GenerationOptions, MetadataMap};
