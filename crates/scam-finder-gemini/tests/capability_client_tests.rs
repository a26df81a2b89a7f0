//! Integration tests for the analysis capability client.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scam_finder_classifier::{Classification, classify};
use scam_finder_gemini::{
    AnalysisTransport, ApiKey, CapabilityConfig, CapabilityError, FailureClass,
    GenerateContentRequest, GenerateContentResponse, GeminiClient, TEMPERATURE,
    classify_capability_error,
};
use scam_finder_prompt::{SYSTEM_INSTRUCTION, assemble};
use serde_json::Value;
use url::Url;

struct ScriptedTransport {
    reply: Result<GenerateContentResponse, CapabilityError>,
    calls: Mutex<Vec<(String, String, GenerateContentRequest)>>,
}

impl ScriptedTransport {
    fn replying(reply: Result<GenerateContentResponse, CapabilityError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock should work").len()
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn generate(
        &self,
        url: &Url,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CapabilityError> {
        self.calls.lock().expect("calls lock should work").push((
            url.to_string(),
            api_key.expose().to_string(),
            request.clone(),
        ));
        self.reply.clone()
    }
}

fn response_with_text(text: &str) -> GenerateContentResponse {
    let envelope = serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    });
    serde_json::from_value(envelope).expect("envelope should decode")
}

fn client(transport: Arc<ScriptedTransport>, api_key: Option<&str>) -> GeminiClient {
    GeminiClient::new(
        CapabilityConfig {
            endpoint: "https://api.example.test".to_string(),
            api_key: api_key.and_then(ApiKey::new),
        },
        transport,
    )
    .expect("client should build")
}

#[tokio::test]
async fn capability_client_tests_missing_credential_never_dispatches() {
    let transport = ScriptedTransport::replying(Ok(response_with_text("{}")));
    let client = client(transport.clone(), None);
    let prompt = assemble(&Classification::none(), None, Some("hello"));

    let error = client.invoke(&prompt).await.expect_err("should fail fast");

    assert_eq!(error, CapabilityError::MissingCredential);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn capability_client_tests_returns_candidate_text() {
    let transport = ScriptedTransport::replying(Ok(response_with_text(r#"{"verdict":"SAFE"}"#)));
    let client = client(transport.clone(), Some("k-123"));
    let prompt = assemble(&Classification::none(), None, Some("hello"));

    let text = client.invoke(&prompt).await.expect("invoke should succeed");

    assert_eq!(text, r#"{"verdict":"SAFE"}"#);
    let calls = transport.calls.lock().expect("calls lock should work");
    assert_eq!(
        calls[0].0,
        "https://api.example.test/v1beta/models/gemini-2.5-flash:generateContent"
    );
    assert_eq!(calls[0].1, "k-123");
}

#[tokio::test]
async fn capability_client_tests_request_carries_fixed_config_and_inline_data() {
    let transport = ScriptedTransport::replying(Ok(response_with_text("{}")));
    let client = client(transport.clone(), Some("k"));
    let prompt = assemble(&classify("photo.png", None), Some(b"abc".as_slice()), None);

    client.invoke(&prompt).await.expect("invoke should succeed");

    let calls = transport.calls.lock().expect("calls lock should work");
    let request = &calls[0].2;
    assert_eq!(request.generation_config.temperature, TEMPERATURE);

    let body: Value = serde_json::from_str(
        &serde_json::to_string(request).expect("request should serialize"),
    )
    .expect("request should parse");
    let parts = &body["contents"][0]["parts"];
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
    assert!(
        parts[1]["text"]
            .as_str()
            .expect("instruction should be text")
            .starts_with("Analyze the provided content")
    );
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
    assert!(body["systemInstruction"].get("role").is_none());
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["temperature"], 0.2);
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        serde_json::json!(["verdict", "scam_score", "red_flags", "urls", "summary"])
    );
}

#[tokio::test]
async fn capability_client_tests_empty_candidates_are_empty_response() {
    let transport = ScriptedTransport::replying(Ok(GenerateContentResponse::default()));
    let client = client(transport, Some("k"));
    let prompt = assemble(&Classification::none(), None, Some("hello"));

    let error = client.invoke(&prompt).await.expect_err("should fail");
    assert_eq!(error, CapabilityError::EmptyResponse);
}

#[tokio::test]
async fn capability_client_tests_blocked_prompt_is_empty_response() {
    let blocked: GenerateContentResponse =
        serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .expect("envelope should decode");
    assert_eq!(blocked.block_reason(), Some("SAFETY"));

    let client = client(ScriptedTransport::replying(Ok(blocked)), Some("k"));
    let prompt = assemble(&Classification::none(), None, Some("hello"));

    let error = client.invoke(&prompt).await.expect_err("should fail");
    assert_eq!(error, CapabilityError::EmptyResponse);
}

#[tokio::test]
async fn capability_client_tests_service_error_propagates() {
    let transport = ScriptedTransport::replying(Err(CapabilityError::Service {
        status: 503,
        body: "overloaded".to_string(),
    }));
    let client = client(transport.clone(), Some("k"));
    let prompt = assemble(&Classification::none(), None, Some("hello"));

    let error = client.invoke(&prompt).await.expect_err("should fail");

    assert!(error.to_string().contains("overloaded"));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn capability_client_tests_response_text_joins_parts_of_first_candidate() {
    let response: GenerateContentResponse = serde_json::from_str(
        r#"{"candidates":[
            {"content":{"parts":[{"text":"{\"a\":"},{"inlineData":{}},{"text":"1}"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#,
    )
    .expect("envelope should decode");

    assert_eq!(response.text().as_deref(), Some(r#"{"a":1}"#));
}

#[test]
fn capability_client_tests_rejects_non_https_endpoint() {
    let error = GeminiClient::new(
        CapabilityConfig {
            endpoint: "http://api.example.test".to_string(),
            api_key: ApiKey::new("k"),
        },
        ScriptedTransport::replying(Ok(GenerateContentResponse::default())),
    )
    .expect_err("plain http should be rejected");

    assert!(matches!(error, CapabilityError::InvalidEndpoint(_)));
}

#[test]
fn capability_client_tests_failure_classes() {
    assert_eq!(
        classify_capability_error(&CapabilityError::Service {
            status: 429,
            body: String::new(),
        }),
        FailureClass::Retriable
    );
    assert_eq!(
        classify_capability_error(&CapabilityError::Service {
            status: 400,
            body: String::new(),
        }),
        FailureClass::Permanent
    );
    assert_eq!(
        classify_capability_error(&CapabilityError::Transport("reset".to_string())),
        FailureClass::Retriable
    );
    assert_eq!(
        classify_capability_error(&CapabilityError::MissingCredential),
        FailureClass::Permanent
    );
}
