#![warn(missing_docs)]
//! # scam-finder-app
//!
//! ## Purpose
//! Orchestrates one scam scan: validation, classification, prompt assembly,
//! the analysis call, and strict result decoding.
//!
//! ## Responsibilities
//! - Load runtime configuration (credential, endpoint, timeout) once.
//! - Load uploaded files with the size gate applied before any read.
//! - Run the classify -> assemble -> invoke -> decode pipeline.
//! - Categorize failures into the user-facing [`ErrorKind`] taxonomy.
//! - Provide log redaction and payload digest helpers.
//!
//! ## Data flow
//! [`AnalysisRequest`] -> [`classify_request`] -> [`assemble`] ->
//! [`GeminiClient::invoke`] -> [`decode_scan_result`] -> [`ScanResult`].
//!
//! ## Ownership and lifetimes
//! [`Scanner`] owns the client and can be shared behind an `Arc`; every scan
//! borrows its request and returns an owned result.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Every error is terminal
//! for the scan; nothing is retried automatically.
//!
//! ## Security and privacy notes
//! - Logs identify payloads by SHA-256 digest, never by content.
//! - Error text passes through [`redact_sensitive`] before it is logged.
//! - Only HTTPS analysis endpoints are accepted (enforced by the client).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use scam_finder_analysis_contract::{AnalysisContractError, ScanResult, decode_scan_result};
use scam_finder_classifier::classify_request;
use scam_finder_core::{AnalysisRequest, CoreError, FilePayload, InputPayload, check_file_size};
use scam_finder_gemini::{
    AnalysisTransport, ApiKey, CapabilityConfig, CapabilityError, DEFAULT_ENDPOINT,
    DEFAULT_TIMEOUT, GeminiClient, ReqwestTransport,
};
use scam_finder_prompt::assemble;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("SCAM_FINDER_VERSION");

/// Primary API key variable.
pub const ENV_API_KEY: &str = "SCAM_FINDER_API_KEY";

/// Fallback API key variable.
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";

/// Analysis endpoint override.
pub const ENV_ENDPOINT: &str = "SCAM_FINDER_ENDPOINT";

/// Request timeout override, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "SCAM_FINDER_TIMEOUT_SECS";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Analysis API key; scans fail before dispatch without one.
    pub api_key: Option<ApiKey>,
    /// Analysis service base URL.
    pub endpoint: String,
    /// Transport timeout for one analysis call.
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// Blank values count as unset. An unparseable or zero timeout falls back
    /// to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let api_key = value(ENV_API_KEY)
            .or_else(|| value(ENV_API_KEY_FALLBACK))
            .and_then(ApiKey::new);
        let endpoint = value(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout = value(ENV_TIMEOUT_SECS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self {
            api_key,
            endpoint,
            timeout,
        }
    }

    fn capability_config(&self) -> CapabilityConfig {
        CapabilityConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

/// Runs scans against the analysis service.
#[derive(Debug, Clone)]
pub struct Scanner {
    client: GeminiClient,
}

impl Scanner {
    /// Builds a scanner with the HTTP transport.
    ///
    /// # Errors
    /// Returns [`AppError::Capability`] when the endpoint is invalid or the
    /// HTTP client cannot be created.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Builds a scanner over an injected transport.
    ///
    /// # Errors
    /// Returns [`AppError::Capability`] when the endpoint is invalid.
    pub fn with_transport(
        config: &AppConfig,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, AppError> {
        let client = GeminiClient::new(config.capability_config(), transport)?;
        Ok(Self { client })
    }

    /// Returns `true` when a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    /// Validates raw inputs and runs one scan.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for empty or oversize input, plus
    /// every error [`Scanner::scan`] can return.
    pub async fn scan_input(
        &self,
        text: &str,
        file: Option<FilePayload>,
    ) -> Result<ScanResult, AppError> {
        let request = AnalysisRequest::new(text, file)?;
        self.scan(&request).await
    }

    /// Runs one scan for a validated request.
    ///
    /// # Errors
    /// - [`AppError::Capability`] for credential, transport, or empty
    ///   response failures.
    /// - [`AppError::Analysis`] when the response is not a valid result.
    pub async fn scan(&self, request: &AnalysisRequest) -> Result<ScanResult, AppError> {
        let classification = classify_request(request);
        let prompt = assemble(
            &classification,
            request.file().map(FilePayload::bytes),
            request.context_text(),
        );

        tracing::info!(
            category = ?classification.category,
            mime_type = %classification.mime_type,
            payload_digest = %request_digest(request),
            "scan started"
        );

        let raw = self.client.invoke(&prompt).await?;
        let result = decode_scan_result(&raw).inspect_err(|error| {
            tracing::warn!(
                error = %redact_sensitive(&error.to_string()),
                response_chars = raw.len(),
                "analysis result rejected"
            );
        })?;

        tracing::info!(
            verdict = result.verdict.as_str(),
            scam_score = result.scam_score,
            red_flags = result.red_flags.len(),
            urls = result.urls.len(),
            "scan completed"
        );
        Ok(result)
    }
}

/// Loads an upload from disk, checking its size before reading any bytes.
///
/// # Errors
/// Returns [`AppError::Validation`] for oversize files or unusable names and
/// [`AppError::Io`] when the file cannot be read.
pub async fn load_file(
    path: &Path,
    declared_mime_type: Option<String>,
) -> Result<FilePayload, AppError> {
    let io_error = |source| AppError::Io {
        path: path.display().to_string(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
    check_file_size(metadata.len())?;

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FilePayload::new(file_name, declared_mime_type, bytes)?)
}

/// Hex SHA-256 digest used to correlate payloads in logs.
pub fn payload_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn request_digest(request: &AnalysisRequest) -> String {
    match request.payload() {
        InputPayload::Text(text) => payload_digest(text.content.as_bytes()),
        InputPayload::File(file) => payload_digest(file.bytes()),
    }
}

const REDACTED: &str = "<redacted>";

/// Names whose `name=value` / `name: value` values are secrets.
const SECRET_KEYS: [&str; 5] = ["x-goog-api-key", "api_key", "authorization", "token", "key"];

const BEARER: &str = "bearer";

/// Replaces secret values in log-bound text with `<redacted>`.
///
/// Only values are replaced: `key=...`, `api_key: ...`, `?key=...&`, and
/// `Bearer <token>`. Prose that merely mentions a key ("API key is missing")
/// is left alone.
pub fn redact_sensitive(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(value_start) = next_secret_value(rest) {
        let value_end = value_start + secret_value_len(&rest[value_start..]);
        output.push_str(&rest[..value_start]);
        output.push_str(REDACTED);
        rest = &rest[value_end..];
    }

    output.push_str(rest);
    output
}

/// Byte offset where the earliest secret value in `text` begins.
fn next_secret_value(text: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let assigned = SECRET_KEYS
        .iter()
        .filter_map(|name| assigned_value_start(&lower, name));
    let bearer = word_positions(&lower, BEARER).find_map(|position| {
        let after = position + BEARER.len();
        let skipped = skip_spaces(&lower, after);
        (skipped > after && skipped < lower.len()).then_some(position)
    });

    assigned.chain(bearer).min()
}

fn assigned_value_start(lower: &str, name: &str) -> Option<usize> {
    word_positions(lower, name).find_map(|position| {
        let separator = skip_spaces(lower, position + name.len());
        matches!(lower.as_bytes().get(separator), Some(b'=' | b':'))
            .then(|| skip_spaces(lower, separator + 1))
    })
}

/// Positions where `word` occurs without touching other word characters.
fn word_positions<'a>(haystack: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    let bytes = haystack.as_bytes();
    haystack
        .match_indices(word)
        .map(|(position, _)| position)
        .filter(move |position| {
            let before = position.checked_sub(1).map(|index| bytes[index]);
            let after = bytes.get(position + word.len()).copied();
            !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
        })
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

fn skip_spaces(text: &str, from: usize) -> usize {
    text.as_bytes()
        .iter()
        .skip(from)
        .take_while(|byte| **byte == b' ' || **byte == b'\t')
        .count()
        + from
}

/// Length of the secret at the start of `value`; a `Bearer` scheme swallows
/// the token that follows it.
fn secret_value_len(value: &str) -> usize {
    let lower = value.to_ascii_lowercase();
    if lower.starts_with(BEARER) {
        let token_start = skip_spaces(&lower, BEARER.len());
        if token_start > BEARER.len() {
            return token_start + token_len(&value[token_start..]);
        }
    }
    token_len(value)
}

fn token_len(value: &str) -> usize {
    value
        .find(|ch: char| ch.is_whitespace() || matches!(ch, '&' | ',' | ';' | '"' | '\''))
        .unwrap_or(value.len())
}

/// User-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// No API key configured.
    Credential,
    /// Network or service failure.
    Transport,
    /// Service returned no text.
    EmptyResponse,
    /// Response was not JSON.
    Decode,
    /// Response JSON violated the result contract.
    Schema,
}

impl ErrorKind {
    /// Stable label for logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Credential => "credential",
            Self::Transport => "transport",
            Self::EmptyResponse => "empty_response",
            Self::Decode => "decode",
            Self::Schema => "schema",
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local input validation failed.
    #[error("{0}")]
    Validation(#[from] CoreError),
    /// Analysis call failed.
    #[error("{0}")]
    Capability(#[from] CapabilityError),
    /// Analysis response was rejected.
    #[error("{0}")]
    Analysis(#[from] AnalysisContractError),
    /// Upload could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path as given.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl AppError {
    /// Categorizes this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Io { .. } => ErrorKind::Validation,
            Self::Capability(CapabilityError::MissingCredential) => ErrorKind::Credential,
            Self::Capability(CapabilityError::EmptyResponse) => ErrorKind::EmptyResponse,
            Self::Capability(
                CapabilityError::InvalidEndpoint(_)
                | CapabilityError::Transport(_)
                | CapabilityError::Service { .. },
            ) => ErrorKind::Transport,
            Self::Analysis(AnalysisContractError::Decode(_)) => ErrorKind::Decode,
            Self::Analysis(
                AnalysisContractError::MissingFields(_) | AnalysisContractError::InvalidContract(_),
            ) => ErrorKind::Schema,
        }
    }
}
