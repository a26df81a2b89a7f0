#![warn(missing_docs)]
//! # scam-finder-report
//!
//! ## Purpose
//! Turns a decoded [`ScanResult`] into what a front-end shows, and tracks the
//! lifecycle of the single in-flight scan.
//!
//! ## Responsibilities
//! - Project results into a [`ReportView`] with score band and headline flags.
//! - Render the view as a plain-text investigation report.
//! - Gate scans through [`ScanSession`] so only one runs at a time.
//!
//! ## Data flow
//! [`ScanResult`] -> [`ReportView::project`] -> [`ReportView::render_text`].
//! Orchestration brackets each scan with [`ScanSession::begin_scan`] and
//! [`ScanSession::complete`].
//!
//! ## Ownership and lifetimes
//! Views own their strings. The session owns the latest result until the next
//! scan or reset.
//!
//! ## Error model
//! Projection is infallible. The only session error is
//! [`SessionError::Busy`]; stale completions are dropped instead of failing.
//!
//! ## Security and privacy notes
//! Views carry model output only, never request payloads or credentials.

use std::fmt;

use scam_finder_analysis_contract::{ImageAnalysisDetails, ScanResult, UrlAssessment, Verdict};

mod session;

pub use session::{ScanSession, ScanTicket, SessionError, SessionState};

/// Header used when the scan had no file.
pub const TEXT_SOURCE_LABEL: &str = "Text Evidence";

/// Message shown when no red flags were reported.
pub const NO_RED_FLAGS_MESSAGE: &str = "No significant red flags found in this content.";

/// Scores above this are likely scams.
pub const LIKELY_SCAM_ABOVE: i64 = 70;

/// Scores below this are likely safe.
pub const LIKELY_SAFE_BELOW: i64 = 20;

/// Scores above this warrant caution.
pub const CAUTION_ABOVE: i64 = 40;

/// Display band for a scam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// Score of 40 or less.
    Clear,
    /// Score above 40, up to 70.
    Caution,
    /// Score above 70.
    Danger,
}

impl ScoreBand {
    /// Short label for text output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }
}

/// Maps a score to its display band. Out-of-range scores are banded as-is.
pub fn score_band(score: i64) -> ScoreBand {
    if score > LIKELY_SCAM_ABOVE {
        ScoreBand::Danger
    } else if score > CAUTION_ABOVE {
        ScoreBand::Caution
    } else {
        ScoreBand::Clear
    }
}

/// One labelled image forensics note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFinding {
    /// Human label, e.g. "Skin Smoothness".
    pub label: &'static str,
    /// Model observation.
    pub observation: String,
}

/// Display projection of one scan result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// File name, or [`TEXT_SOURCE_LABEL`].
    pub source: String,
    /// Verdict as returned.
    pub verdict: Verdict,
    /// Score as returned, not clamped.
    pub score: i64,
    /// Display band for `score`.
    pub band: ScoreBand,
    /// `score > 70`.
    pub likely_scam: bool,
    /// `score < 20`.
    pub likely_safe: bool,
    /// Executive summary.
    pub summary: String,
    /// Detected threats.
    pub red_flags: Vec<String>,
    /// URL assessments.
    pub urls: Vec<UrlAssessment>,
    /// AI-generation likelihood as a whole percentage.
    pub ai_image_percent: Option<i64>,
    /// Non-empty image forensics notes, in fixed order.
    pub image_findings: Vec<ImageFinding>,
    /// Extracted text preview.
    pub extracted_text_preview: Option<String>,
}

impl ReportView {
    /// Projects `result` for display. `file_name` is the scanned file, if any.
    pub fn project(result: &ScanResult, file_name: Option<&str>) -> Self {
        let source = file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(TEXT_SOURCE_LABEL)
            .to_string();

        Self {
            source,
            verdict: result.verdict,
            score: result.scam_score,
            band: score_band(result.scam_score),
            likely_scam: result.scam_score > LIKELY_SCAM_ABOVE,
            likely_safe: result.scam_score < LIKELY_SAFE_BELOW,
            summary: result.summary.clone(),
            red_flags: result.red_flags.clone(),
            urls: result.urls.clone(),
            ai_image_percent: result.ai_image_probability.map(probability_percent),
            image_findings: result
                .image_analysis_details
                .as_ref()
                .map(image_findings)
                .unwrap_or_default(),
            extracted_text_preview: result
                .extracted_text_preview
                .clone()
                .filter(|preview| !preview.is_empty()),
        }
    }

    /// Renders the plain-text investigation report.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Investigation Report: {}", self.source)?;
        writeln!(
            f,
            "Verdict: {} (score {}/100, {})",
            self.verdict.as_str(),
            self.score,
            self.band.label()
        )?;
        if self.likely_scam {
            writeln!(f, "Warning: this content is likely a scam.")?;
        } else if self.likely_safe {
            writeln!(f, "This content looks safe.")?;
        }

        if let Some(percent) = self.ai_image_percent {
            writeln!(f)?;
            writeln!(f, "AI Manipulation: {percent}% probability")?;
            for finding in &self.image_findings {
                writeln!(f, "  {}: {}", finding.label, finding.observation)?;
            }
        } else if !self.image_findings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Image Forensics:")?;
            for finding in &self.image_findings {
                writeln!(f, "  {}: {}", finding.label, finding.observation)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Executive Summary")?;
        writeln!(f, "  {}", self.summary)?;

        writeln!(f)?;
        writeln!(f, "Detected Threats ({})", self.red_flags.len())?;
        if self.red_flags.is_empty() {
            writeln!(f, "  {NO_RED_FLAGS_MESSAGE}")?;
        }
        for flag in &self.red_flags {
            writeln!(f, "  - {flag}")?;
        }

        if !self.urls.is_empty() {
            writeln!(f)?;
            writeln!(f, "Link Analysis")?;
            for assessment in &self.urls {
                writeln!(f, "  {} [{:?} Risk]", assessment.url, assessment.risk)?;
                for issue in &assessment.issues {
                    writeln!(f, "    * {issue}")?;
                }
            }
        }

        if let Some(preview) = &self.extracted_text_preview {
            writeln!(f)?;
            writeln!(f, "Decoded Content Preview")?;
            writeln!(f, "  {preview}")?;
        }

        Ok(())
    }
}

fn probability_percent(probability: f64) -> i64 {
    (probability * 100.0).round() as i64
}

fn image_findings(details: &ImageAnalysisDetails) -> Vec<ImageFinding> {
    [
        ("Skin Smoothness", &details.skin_smoothness),
        ("Background Warping", &details.background_warping),
        ("Reflection Symmetry", &details.reflection_symmetry),
        ("Edge Consistency", &details.edge_consistency),
    ]
    .into_iter()
    .filter(|(_, observation)| !observation.trim().is_empty())
    .map(|(label, observation)| ImageFinding {
        label,
        observation: observation.clone(),
    })
    .collect()
}
