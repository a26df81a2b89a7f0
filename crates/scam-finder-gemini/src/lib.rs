#![warn(missing_docs)]
//! # scam-finder-gemini
//!
//! ## Purpose
//! Calls the hosted generative model that performs the actual content
//! analysis.
//!
//! ## Responsibilities
//! - Validate the service endpoint (HTTPS only) and build the
//!   `generateContent` URL for the fixed model.
//! - Translate an assembled prompt into the request body, with the fixed
//!   response schema, system instruction, and temperature.
//! - Execute the call through an injectable [`AnalysisTransport`].
//! - Surface the raw response text, or a [`CapabilityError`].
//!
//! ## Data flow
//! [`scam_finder_prompt::PromptPayload`] -> [`GeminiClient::invoke`] ->
//! [`AnalysisTransport::generate`] -> response text -> result decoding.
//!
//! ## Ownership and lifetimes
//! The client owns its transport behind `Arc<dyn AnalysisTransport>` so one
//! client can be shared by concurrent front-end sessions.
//!
//! ## Error model
//! A missing API key fails before the transport is touched. Transport and
//! service failures propagate unchanged; no retry happens here.
//!
//! ## Security and privacy notes
//! The API key travels in a request header, never in the URL, and its `Debug`
//! output is redacted.

use std::fmt;
use std::sync::Arc;

use scam_finder_prompt::PromptPayload;
use thiserror::Error;
use url::Url;

mod transport;
mod wire;

pub use transport::{AnalysisTransport, DEFAULT_TIMEOUT, ReqwestTransport};
pub use wire::{
    Candidate, CandidateContent, CandidatePart, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, Part, PromptFeedback,
};

/// Public Generative Language API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Model used for every analysis.
pub const MODEL_ID: &str = "gemini-2.5-flash";

/// Low sampling temperature to keep verdicts stable.
pub const TEMPERATURE: f32 = 0.2;

/// Response MIME type requested from the model.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Analysis service API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key; blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Returns the raw key for the transport header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct CapabilityConfig {
    /// Service base URL; must be HTTPS.
    pub endpoint: String,
    /// API key; absence fails every call.
    pub api_key: Option<ApiKey>,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

/// Analysis client bound to one endpoint and credential.
#[derive(Clone)]
pub struct GeminiClient {
    url: Url,
    api_key: Option<ApiKey>,
    transport: Arc<dyn AnalysisTransport>,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client with a validated endpoint.
    ///
    /// # Errors
    /// Returns [`CapabilityError::InvalidEndpoint`] when the endpoint is not a
    /// valid HTTPS URL.
    pub fn new(
        config: CapabilityConfig,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, CapabilityError> {
        let url = generate_content_url(&config.endpoint, MODEL_ID)?;
        Ok(Self {
            url,
            api_key: config.api_key,
            transport,
        })
    }

    /// Returns the resolved `generateContent` URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns `true` when an API key is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Runs one analysis and returns the model's raw response text.
    ///
    /// # Errors
    /// - [`CapabilityError::MissingCredential`] without an API key; the
    ///   transport is never called.
    /// - Transport/service errors from [`AnalysisTransport::generate`].
    /// - [`CapabilityError::EmptyResponse`] when the model returns no text.
    pub async fn invoke(&self, prompt: &PromptPayload) -> Result<String, CapabilityError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(CapabilityError::MissingCredential)?;

        let request = GenerateContentRequest::from_prompt(prompt);
        tracing::info!(
            model = MODEL_ID,
            parts = prompt.parts().len(),
            inline_parts = prompt.inline_binary_count(),
            "dispatching analysis request"
        );

        let response = self
            .transport
            .generate(&self.url, api_key, &request)
            .await
            .inspect_err(|error| tracing::warn!(%error, "analysis request failed"))?;

        match response.text() {
            Some(text) => {
                tracing::info!(response_chars = text.len(), "analysis response received");
                Ok(text)
            }
            None => {
                tracing::warn!(
                    block_reason = response.block_reason().unwrap_or("none"),
                    candidates = response.candidates.len(),
                    "analysis response carried no text"
                );
                Err(CapabilityError::EmptyResponse)
            }
        }
    }
}

/// Builds `{endpoint}/v1beta/models/{model}:generateContent`.
///
/// # Errors
/// Returns [`CapabilityError::InvalidEndpoint`] for unparseable or non-HTTPS
/// endpoints.
pub fn generate_content_url(endpoint: &str, model: &str) -> Result<Url, CapabilityError> {
    let mut url = Url::parse(endpoint)
        .map_err(|error| CapabilityError::InvalidEndpoint(format!("invalid url: {error}")))?;

    if url.scheme() != "https" {
        return Err(CapabilityError::InvalidEndpoint(
            "analysis endpoint must use https".to_string(),
        ));
    }

    url.path_segments_mut()
        .map_err(|()| CapabilityError::InvalidEndpoint("endpoint cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["v1beta", "models", format!("{model}:generateContent").as_str()]);

    Ok(url)
}

/// Whether resubmitting the same scan could plausibly succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Network hiccup, throttling, or server-side failure.
    Retriable,
    /// Needs a configuration or input change first.
    Permanent,
}

/// Classifies a capability error for user-facing messaging.
pub fn classify_capability_error(error: &CapabilityError) -> FailureClass {
    match error {
        CapabilityError::Transport(_) | CapabilityError::EmptyResponse => FailureClass::Retriable,
        CapabilityError::Service { status, .. } if *status == 429 || *status >= 500 => {
            FailureClass::Retriable
        }
        CapabilityError::Service { .. }
        | CapabilityError::MissingCredential
        | CapabilityError::InvalidEndpoint(_) => FailureClass::Permanent,
    }
}

/// Analysis capability errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// No API key configured.
    #[error("API key is missing; configure one before scanning")]
    MissingCredential,
    /// Endpoint violates policy.
    #[error("invalid analysis endpoint: {0}")]
    InvalidEndpoint(String),
    /// Connection, timeout, or body failure.
    #[error("analysis transport failure: {0}")]
    Transport(String),
    /// Non-success HTTP status.
    #[error("analysis service returned HTTP {status}: {body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },
    /// Model returned no text.
    #[error("no response from analysis service")]
    EmptyResponse,
}
