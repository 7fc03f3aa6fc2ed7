//! Anthropic transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response, StatusCode};

use crate::{ClientFuture, ProviderError, SecretString};

use super::serde_api::{AnthropicApiRequest, AnthropicApiResponse, extract_error_message};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

pub trait AnthropicTransport: Send + Sync + std::fmt::Debug {
    fn send<'a>(
        &'a self,
        request: &'a AnthropicApiRequest,
        api_key: &'a SecretString,
    ) -> ClientFuture<'a, Result<AnthropicApiResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct AnthropicHttpTransport {
    client: Client,
    base_url: String,
    api_version: String,
}

impl AnthropicHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_version: ANTHROPIC_API_VERSION.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("Anthropic request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST
            | StatusCode::NOT_FOUND
            | StatusCode::PAYLOAD_TOO_LARGE
            | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::invalid_request(message),
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
                ProviderError::unavailable(message)
            }
            // 529: Anthropic "overloaded".
            status if status.as_u16() == 529 => ProviderError::unavailable(message),
            _ => ProviderError::transport(message),
        }
    }
}

impl AnthropicTransport for AnthropicHttpTransport {
    fn send<'a>(
        &'a self,
        request: &'a AnthropicApiRequest,
        api_key: &'a SecretString,
    ) -> ClientFuture<'a, Result<AnthropicApiResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint("messages"))
                .header("x-api-key", api_key.expose())
                .header("anthropic-version", &self.api_version)
                .json(request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<AnthropicApiResponse>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}
