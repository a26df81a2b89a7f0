#![warn(missing_docs)]
//! # scam-finder-analysis-contract
//!
//! ## Purpose
//! Defines the structured scan result the analysis model must return, the
//! response schema sent with every request, and strict client-side decoding.
//!
//! ## Responsibilities
//! - Declare [`ScanResult`] and its nested types.
//! - Expose the model-facing response schema ([`response_schema`]).
//! - Decode raw model text, re-validating required fields.
//!
//! ## Data flow
//! Raw model text -> [`decode_scan_result`] -> [`ScanResult`] -> report
//! projection.
//!
//! ## Ownership and lifetimes
//! Decoded results own their strings; they are immutable snapshots held for
//! one render cycle.
//!
//! ## Error model
//! Invalid JSON returns [`AnalysisContractError::Decode`]. Missing required
//! fields return [`AnalysisContractError::MissingFields`] naming every absent
//! field. Wrong shapes or enum values return
//! [`AnalysisContractError::InvalidContract`].
//!
//! Out-of-range `scam_score` and `ai_image_probability` values are passed
//! through unchanged.
//!
//! ## Security and privacy notes
//! This crate processes only model output; it never sees credentials.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Fields the model must always return.
pub const REQUIRED_FIELDS: [&str; 5] = ["verdict", "scam_score", "red_flags", "urls", "summary"];

/// Fields every `urls` entry must carry.
pub const URL_REQUIRED_FIELDS: [&str; 2] = ["url", "risk"];

/// Top-level categorical judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No scam indicators found.
    Safe,
    /// Some indicators; caution advised.
    Suspicious,
    /// Strong scam indicators.
    Scam,
    /// Model could not decide.
    Uncertain,
}

impl Verdict {
    /// Wire label (`SAFE`, `SUSPICIOUS`, `SCAM`, `UNCERTAIN`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Suspicious => "SUSPICIOUS",
            Self::Scam => "SCAM",
            Self::Uncertain => "UNCERTAIN",
        }
    }
}

/// Risk assigned to one extracted URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrlRiskLevel {
    /// Likely malicious.
    High,
    /// Questionable.
    Medium,
    /// Minor concerns.
    Low,
    /// No concerns.
    Safe,
}

/// Assessment of one URL found in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlAssessment {
    /// URL as found in the content.
    pub url: String,
    /// Assigned risk.
    pub risk: UrlRiskLevel,
    /// Specific problems (shortener, punycode, domain mismatch, ...).
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Heuristic notes from image forensics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAnalysisDetails {
    /// Skin texture observations.
    pub skin_smoothness: String,
    /// Background distortion observations.
    pub background_warping: String,
    /// Eye reflection symmetry observations.
    pub reflection_symmetry: String,
    /// Object edge observations.
    pub edge_consistency: String,
}

/// Structured verdict returned for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Final verdict.
    pub verdict: Verdict,
    /// Scam likelihood, nominally 0-100.
    pub scam_score: i64,
    /// Indicators such as urgency, poor grammar, or money requests.
    pub red_flags: Vec<String>,
    /// URLs found in the content.
    pub urls: Vec<UrlAssessment>,
    /// Concise summary of findings.
    pub summary: String,
    /// Probability in [0.0, 1.0] that an analyzed image is AI generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_image_probability: Option<f64>,
    /// Image forensics notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis_details: Option<ImageAnalysisDetails>,
    /// Leading text extracted from the file or image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_preview: Option<String>,
}

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {
                "type": "STRING",
                "enum": ["SAFE", "SUSPICIOUS", "SCAM", "UNCERTAIN"],
                "description": "The final verdict of the scam analysis."
            },
            "scam_score": {
                "type": "INTEGER",
                "description": "A score from 0 to 100 indicating likelihood of a scam (100 = definitely scam)."
            },
            "red_flags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of specific indicators like urgency, poor grammar, money requests, or malicious scripts."
            },
            "urls": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "url": { "type": "STRING" },
                        "risk": { "type": "STRING", "enum": ["High", "Medium", "Low", "Safe"] },
                        "issues": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": URL_REQUIRED_FIELDS
                },
                "description": "Analysis of URLs found in the content."
            },
            "summary": {
                "type": "STRING",
                "description": "A concise summary of the findings."
            },
            "ai_image_probability": {
                "type": "NUMBER",
                "description": "If an image is analyzed, probability (0.0-1.0) it is AI generated."
            },
            "image_analysis_details": {
                "type": "OBJECT",
                "properties": {
                    "skin_smoothness": { "type": "STRING" },
                    "background_warping": { "type": "STRING" },
                    "reflection_symmetry": { "type": "STRING" },
                    "edge_consistency": { "type": "STRING" }
                },
                "description": "Heuristic details for image analysis."
            },
            "extracted_text_preview": {
                "type": "STRING",
                "description": "The first 200 chars of text extracted from the file/image."
            }
        },
        "required": REQUIRED_FIELDS
    })
});

/// Returns the response schema declared to the model on every call.
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

/// Decodes raw model output into a validated [`ScanResult`].
///
/// A required field that is present but `null` counts as missing. Missing
/// fields inside `urls` entries are reported as `urls[<index>].<field>`.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON.
/// Returns [`AnalysisContractError::MissingFields`] when required fields are
/// absent.
/// Returns [`AnalysisContractError::InvalidContract`] for non-object payloads
/// or fields of the wrong shape.
pub fn decode_scan_result(raw: &str) -> Result<ScanResult, AnalysisContractError> {
    let value: Value = serde_json::from_str(raw).map_err(AnalysisContractError::Decode)?;

    let Some(object) = value.as_object() else {
        return Err(AnalysisContractError::InvalidContract(
            "scan result is not a JSON object".to_string(),
        ));
    };

    let mut missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| object.get(**field).is_none_or(Value::is_null))
        .map(|field| field.to_string())
        .collect();
    if let Some(urls) = object.get("urls").and_then(Value::as_array) {
        for (index, entry) in urls.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            missing.extend(
                URL_REQUIRED_FIELDS
                    .iter()
                    .filter(|field| entry.get(**field).is_none_or(Value::is_null))
                    .map(|field| format!("urls[{index}].{field}")),
            );
        }
    }
    if !missing.is_empty() {
        return Err(AnalysisContractError::MissingFields(missing));
    }

    serde_json::from_value(value)
        .map_err(|error| AnalysisContractError::InvalidContract(error.to_string()))
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// Model output is not valid JSON.
    #[error("unparseable result: {0}")]
    Decode(#[from] serde_json::Error),
    /// Required fields are absent.
    #[error("unparseable result: missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// Payload violates the result contract.
    #[error("unparseable result: {0}")]
    InvalidContract(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for strict decoding.

    use super::*;

    #[test]
    fn null_required_field_counts_as_missing() {
        let raw = r#"{"verdict":"SAFE","scam_score":1,"red_flags":[],"urls":[],"summary":null}"#;
        match decode_scan_result(raw) {
            Err(AnalysisContractError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["summary".to_string()]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn schema_requires_every_required_field() {
        let required = response_schema()["required"]
            .as_array()
            .expect("required should be an array");
        assert_eq!(required.len(), REQUIRED_FIELDS.len());

        let url_required = &response_schema()["properties"]["urls"]["items"]["required"];
        assert_eq!(url_required, &serde_json::json!(URL_REQUIRED_FIELDS));
    }
}
