#![warn(missing_docs)]
//! # scam-finder-prompt
//!
//! ## Purpose
//! Builds the ordered content parts sent to the analysis model for one scan.
//!
//! ## Responsibilities
//! - Frame file bytes as inline binary, or as delimited text for HTML sources.
//! - Append exactly one instruction part: base checklist, category checklist,
//!   and the user's additional context.
//! - Hold the fixed system instruction.
//!
//! ## Data flow
//! [`scam_finder_classifier::Classification`] + payload bytes + context text
//! -> [`assemble`] -> [`PromptPayload`] -> capability client.
//!
//! ## Ownership and lifetimes
//! Parts own copies of payload bytes so the prompt outlives the request that
//! produced it.
//!
//! ## Error model
//! Assembly is infallible. HTML that is not valid UTF-8 degrades to an inline
//! binary part instead of failing the scan.
//!
//! ## Security and privacy notes
//! Diagnostics log part counts and categories only, never content.

use scam_finder_classifier::{Classification, ContentCategory, classify_request};
use scam_finder_core::AnalysisRequest;

/// Persona and stance given to the model on every call.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert cybersecurity analyst and fraud detection system. Be critical and detail-oriented. For HTML files, pay special attention to scripts and hidden redirects.";

/// Instruction block included in every prompt.
pub const BASE_INSTRUCTION: &str = "Analyze the provided content for scam indicators.

1. Text Scam Analysis:
   - Extract all URLs, Phone Numbers, Emails.
   - Flag poor grammar, urgency keywords, money-transfer patterns.
   - Detect URL shorteners, punycode, or mismatched domains.
";

/// Checklist for HTML/web sources.
pub const HTML_CHECKLIST: &str = "
2. HTML/Web Source Analysis:
   - CRITICAL: Identify embedded malicious scripts, hidden iframes, or obfuscated JS.
   - Analyze href attributes for phishing redirects.
   - Detect deceptive visual overlays or fake login form structures.
";

/// Checklist for email containers.
pub const EMAIL_CHECKLIST: &str = "
2. Email/Outlook File Analysis:
   - Analyze email headers (if visible) for spoofing.
   - Check for \"From\" address mismatches.
   - Detect phishing attachments or links to credential harvesting sites.
";

/// Checklist for images.
pub const IMAGE_CHECKLIST: &str = "
2. Image Forensics (AI Likelihood):
   - Analyze skin smoothness, background warping, eye reflection symmetry, object edge consistency.
   - Estimate AI generation probability.
";

/// Checklist for other documents.
pub const DOCUMENT_CHECKLIST: &str = "
2. Document Analysis:
   - Extract readable text from the document.
   - Analyze the content for fraudulent patterns.
";

/// Opening delimiter around decoded HTML.
pub const HTML_CONTENT_START: &str = "[ANALYSIS TARGET: HTML FILE CONTENT START]";

/// Closing delimiter around decoded HTML.
pub const HTML_CONTENT_END: &str = "[HTML FILE CONTENT END]";

/// Label placed before user-supplied context.
pub const CONTEXT_LABEL: &str = "Additional Context/Text Input:";

/// One part of the model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    /// Raw bytes with their MIME type.
    InlineBinary {
        /// Payload bytes.
        bytes: Vec<u8>,
        /// MIME type from classification.
        mime_type: String,
    },
    /// Plain text.
    Text {
        /// Text content.
        text: String,
    },
}

/// Ordered parts for one model call.
///
/// Content parts always precede the single trailing instruction part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    parts: Vec<PromptPart>,
}

impl PromptPayload {
    /// Returns all parts in send order.
    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    /// Returns the trailing instruction text.
    pub fn instruction(&self) -> &str {
        match self.parts.last() {
            Some(PromptPart::Text { text }) => text,
            _ => "",
        }
    }

    /// Returns the number of inline binary parts.
    pub fn inline_binary_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, PromptPart::InlineBinary { .. }))
            .count()
    }

    /// Consumes the payload, returning its parts.
    pub fn into_parts(self) -> Vec<PromptPart> {
        self.parts
    }
}

/// Builds the prompt for a classified payload.
///
/// `payload` is ignored when `classification` is [`ContentCategory::None`].
/// Blank `context` is omitted.
pub fn assemble(
    classification: &Classification,
    payload: Option<&[u8]>,
    context: Option<&str>,
) -> PromptPayload {
    let mut parts = Vec::with_capacity(2);

    if classification.category != ContentCategory::None
        && let Some(bytes) = payload
    {
        parts.push(content_part(classification, bytes));
    }

    parts.push(PromptPart::Text {
        text: instruction_text(classification.category, context),
    });

    tracing::debug!(
        category = ?classification.category,
        parts = parts.len(),
        "prompt assembled"
    );

    PromptPayload { parts }
}

/// Classifies and assembles the prompt for a validated request.
pub fn assemble_request(request: &AnalysisRequest) -> PromptPayload {
    let classification = classify_request(request);
    assemble(
        &classification,
        request.file().map(|file| file.bytes()),
        request.context_text(),
    )
}

/// Returns the category-specific checklist, if the category has one.
pub fn checklist_for(category: ContentCategory) -> Option<&'static str> {
    match category {
        ContentCategory::HtmlSource => Some(HTML_CHECKLIST),
        ContentCategory::EmailContainer => Some(EMAIL_CHECKLIST),
        ContentCategory::Image => Some(IMAGE_CHECKLIST),
        ContentCategory::GenericDocument => Some(DOCUMENT_CHECKLIST),
        ContentCategory::None => None,
    }
}

fn content_part(classification: &Classification, bytes: &[u8]) -> PromptPart {
    if classification.category == ContentCategory::HtmlSource {
        match std::str::from_utf8(bytes) {
            Ok(html) => {
                return PromptPart::Text {
                    text: format!("{HTML_CONTENT_START}\n{html}\n{HTML_CONTENT_END}"),
                };
            }
            Err(error) => {
                tracing::warn!(%error, "html payload is not valid utf-8; sending inline bytes");
            }
        }
    }

    PromptPart::InlineBinary {
        bytes: bytes.to_vec(),
        mime_type: classification.mime_type.clone(),
    }
}

fn instruction_text(category: ContentCategory, context: Option<&str>) -> String {
    let mut text = String::from(BASE_INSTRUCTION);
    if let Some(checklist) = checklist_for(category) {
        text.push_str(checklist);
    }
    if let Some(context) = context.filter(|context| !context.trim().is_empty()) {
        text.push('\n');
        text.push_str(CONTEXT_LABEL);
        text.push(' ');
        text.push_str(context);
    }
    text
}

#[cfg(test)]
mod tests {
    //! Unit tests for instruction composition.

    use super::*;

    #[test]
    fn text_only_instruction_has_no_checklist() {
        let text = instruction_text(ContentCategory::None, Some("hello"));
        assert!(text.starts_with(BASE_INSTRUCTION));
        assert!(!text.contains("2. "));
        assert!(text.ends_with("Additional Context/Text Input: hello"));
    }

    #[test]
    fn blank_context_is_omitted() {
        let text = instruction_text(ContentCategory::Image, Some("  "));
        assert!(!text.contains(CONTEXT_LABEL));
        assert!(text.contains("Image Forensics"));
    }

    #[test]
    fn payload_ignored_without_category() {
        let prompt = assemble(&Classification::none(), Some(b"bytes".as_slice()), None);
        assert_eq!(prompt.parts().len(), 1);
        assert_eq!(prompt.inline_binary_count(), 0);
    }
}
