//! HTTP transport for the analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::{API_KEY_HEADER, ApiKey, CapabilityError};

/// Default request timeout; the only timeout in the scan path.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends one `generateContent` call.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Posts `request` to `url` authenticated with `api_key`.
    ///
    /// # Errors
    /// Returns [`CapabilityError::Transport`] for connection, timeout, or body
    /// failures and [`CapabilityError::Service`] for non-success statuses.
    async fn generate(
        &self,
        url: &Url,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CapabilityError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns [`CapabilityError::Transport`] when the HTTP client cannot be
    /// constructed (for example, TLS backend initialization failure).
    pub fn new(timeout: Duration) -> Result<Self, CapabilityError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                CapabilityError::Transport(format!("failed to create http client: {error}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl AnalysisTransport for ReqwestTransport {
    async fn generate(
        &self,
        url: &Url,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CapabilityError> {
        let response = self
            .client
            .post(url.clone())
            .header(API_KEY_HEADER, api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|error| CapabilityError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|error| format!("<unreadable body: {error}>"));
            return Err(CapabilityError::Service {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|error| CapabilityError::Transport(format!("invalid response body: {error}")))
    }
}
