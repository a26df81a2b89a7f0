//! Shared fixtures for app integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scam_finder_app::{AppConfig, Scanner};
use scam_finder_gemini::{
    AnalysisTransport, ApiKey, Candidate, CandidateContent, CandidatePart, CapabilityError,
    GenerateContentRequest, GenerateContentResponse,
};
use url::Url;

/// Scam verdict returned by the fake service.
#[allow(dead_code)]
pub const SCAM_JSON: &str =
    r#"{"verdict":"SCAM","scam_score":95,"red_flags":["urgency"],"urls":[],"summary":"..."}"#;

/// Transport that replays one canned outcome and records requests.
pub struct ScriptedTransport {
    outcome: Result<GenerateContentResponse, CapabilityError>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Replies with `text` as the only candidate part.
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_outcome(Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some(text.to_string()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }))
    }

    /// Replies with `outcome`.
    pub fn with_outcome(outcome: Result<GenerateContentResponse, CapabilityError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn generate(
        &self,
        _url: &Url,
        _api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CapabilityError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.outcome.clone()
    }
}

/// Config with a test credential.
#[allow(dead_code)]
pub fn config_with_key() -> AppConfig {
    AppConfig {
        api_key: ApiKey::new("test-key"),
        ..AppConfig::default()
    }
}

/// Scanner over `transport` with a test credential.
#[allow(dead_code)]
pub fn scanner(transport: Arc<ScriptedTransport>) -> Scanner {
    Scanner::with_transport(&config_with_key(), transport).expect("scanner should build")
}
