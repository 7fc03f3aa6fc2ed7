//! Anthropic model client implemented over a pluggable transport.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    ClientFuture, ModelClient, ModelRequest, ModelResponse, NoopOperationHooks, ProviderError,
    ProviderId, ProviderOperationHooks, RetryPolicy, SecretString, execute_with_retry,
};

use super::serde_api::build_api_request;
use super::transport::{AnthropicHttpTransport, AnthropicTransport};

pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_MAX_TOKENS: u32 = 800;

#[derive(Clone)]
pub struct AnthropicClient {
    api_key: SecretString,
    transport: Arc<dyn AnthropicTransport>,
    fallback_model: String,
    default_max_tokens: u32,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<SecretString>,
        transport: Arc<dyn AnthropicTransport>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::authentication(
                "Anthropic API key must not be empty",
            ));
        }

        Ok(Self {
            api_key,
            transport,
            fallback_model: ANTHROPIC_DEFAULT_MODEL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            retry_policy: RetryPolicy::default(),
            hooks: Arc::new(NoopOperationHooks),
        })
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn default_http_transport(client: Client) -> AnthropicHttpTransport {
        AnthropicHttpTransport::new(client)
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_key", &self.api_key)
            .field("transport", &self.transport)
            .field("fallback_model", &self.fallback_model)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

impl ModelClient for AnthropicClient {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn invoke<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ClientFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_request =
                build_api_request(request, &self.fallback_model, self.default_max_tokens)?;

            let transport = &self.transport;
            let api_request = &api_request;
            let api_key = &self.api_key;

            let response = execute_with_retry(
                ProviderId::Anthropic,
                "messages",
                &self.retry_policy,
                self.hooks.as_ref(),
                move |_attempt| transport.send(api_request, api_key),
                tokio::time::sleep,
            )
            .await?;

            ModelResponse::try_from(response)
        })
    }
}
