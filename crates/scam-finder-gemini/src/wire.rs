//! `generateContent` request and response bodies.

use base64::Engine as _;
use scam_finder_analysis_contract::response_schema;
use scam_finder_prompt::{PromptPart, PromptPayload, SYSTEM_INSTRUCTION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{RESPONSE_MIME_TYPE, TEMPERATURE};

/// Request body for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// User turn carrying the prompt parts.
    pub contents: Vec<Content>,
    /// Fixed persona instruction.
    pub system_instruction: Content,
    /// Output schema and sampling settings.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Builds the request for an assembled prompt with the fixed schema,
    /// system instruction, and temperature.
    pub fn from_prompt(prompt: &PromptPayload) -> Self {
        let parts = prompt.parts().iter().map(Part::from_prompt_part).collect();

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: response_schema().clone(),
                temperature: TEMPERATURE,
            },
        }
    }
}

/// Content container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    /// Turn role; omitted for the system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts.
    pub parts: Vec<Part>,
}

/// Text or inline media part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        /// Text content.
        text: String,
    },
    /// Base64 media.
    InlineData {
        /// Encoded bytes and MIME type.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    fn from_prompt_part(part: &PromptPart) -> Self {
        match part {
            PromptPart::Text { text } => Self::Text { text: text.clone() },
            PromptPart::InlineBinary { bytes, mime_type } => Self::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(bytes),
                },
            },
        }
    }
}

/// Base64 payload with MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the decoded bytes.
    pub mime_type: String,
    /// Standard base64 encoding.
    pub data: String,
}

/// Output controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Always `application/json`.
    pub response_mime_type: String,
    /// Structural contract for the result.
    pub response_schema: Value,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate completions; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when there is no
    /// non-empty text.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        (!text.trim().is_empty()).then_some(text)
    }

    /// Block reason reported for the prompt, if any.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when generation was stopped early.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Generated content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateContent {
    /// Generated parts.
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// Generated part; non-text parts carry no `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidatePart {
    /// Text, when present.
    #[serde(default)]
    pub text: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Block reason, when blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}
