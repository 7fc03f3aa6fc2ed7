//! Model client construction for facade consumers.

use std::sync::Arc;

use lprovider::{ModelClient, ProviderError, ProviderOperationHooks};
use reqwest::Client;

use crate::AssistantConfig;

/// Builds the HTTP-backed Anthropic client with the configured request
/// timeout, model and generation defaults.
pub fn build_client(
    config: &AssistantConfig,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelClient>, ProviderError> {
    let api_key = config.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(ProviderError::authentication(
            "provider API key must not be empty",
        ));
    }

    let http = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    build_anthropic_client(config, api_key, http, hooks)
}

#[cfg(feature = "provider-anthropic")]
fn build_anthropic_client(
    config: &AssistantConfig,
    api_key: String,
    http: Client,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelClient>, ProviderError> {
    use lprovider::adapters::anthropic::AnthropicClient;

    let transport = Arc::new(AnthropicClient::default_http_transport(http));
    let client = AnthropicClient::new(api_key, transport)?
        .with_fallback_model(config.model.clone())
        .with_default_max_tokens(config.max_tokens)
        .with_hooks(hooks);
    Ok(Arc::new(client))
}

#[cfg(not(feature = "provider-anthropic"))]
fn build_anthropic_client(
    _config: &AssistantConfig,
    _api_key: String,
    _http: Client,
    _hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelClient>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-anthropic feature is not enabled on lectern",
    ))
}
