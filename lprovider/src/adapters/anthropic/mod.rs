//! Anthropic Messages API client.

mod client;
mod serde_api;
mod transport;

pub use client::{ANTHROPIC_DEFAULT_MODEL, AnthropicClient};
pub use serde_api::{
    AnthropicApiBlock, AnthropicApiMessage, AnthropicApiRequest, AnthropicApiResponse,
    AnthropicApiTool, AnthropicApiToolChoice, AnthropicApiUsage,
};
pub use transport::{
    ANTHROPIC_API_VERSION, ANTHROPIC_BASE_URL, AnthropicHttpTransport, AnthropicTransport,
};
