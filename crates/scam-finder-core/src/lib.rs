#![warn(missing_docs)]
//! # scam-finder-core
//!
//! ## Purpose
//! Defines the pure input data model used across the `scam-finder` workspace.
//!
//! ## Responsibilities
//! - Represent free-text and file inputs submitted for one scan.
//! - Enforce the local upload gates (file size, text length, non-empty request)
//!   before anything is classified or dispatched.
//!
//! ## Data flow
//! Front-ends build a [`FilePayload`] (optional) and free text, then combine
//! them into one [`AnalysisRequest`]. The classifier and prompt assembler only
//! ever see validated requests.
//!
//! ## Ownership and lifetimes
//! Payloads own their buffers (`Vec<u8>`, `String`) so a request can be moved
//! into an async scan without borrowing from UI state.
//!
//! ## Error model
//! Every violated gate returns a [`CoreError`] variant. These are local
//! validation failures and never reach the network.
//!
//! ## Security and privacy notes
//! This crate never logs payload bytes or text content.
//!
//! ## Example
//! ```rust
//! use scam_finder_core::{AnalysisRequest, InputPayload};
//!
//! let request = AnalysisRequest::new("You won a prize!", None).unwrap();
//! assert!(matches!(request.payload(), InputPayload::Text(_)));
//! assert_eq!(request.context_text(), Some("You won a prize!"));
//! ```

use thiserror::Error;

/// Upper bound for uploaded file size (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Upper bound for free text length, counted in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Free-form text submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    /// Text content as typed or pasted by the user.
    pub content: String,
}

impl TextPayload {
    /// Constructs a validated text payload.
    ///
    /// # Errors
    /// Returns [`CoreError::TextTooLong`] when `content` exceeds
    /// [`MAX_TEXT_CHARS`] characters.
    pub fn new(content: impl Into<String>) -> Result<Self, CoreError> {
        let content = content.into();
        check_text_length(&content)?;
        Ok(Self { content })
    }
}

/// Uploaded file with its declared metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    file_name: String,
    declared_mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl FilePayload {
    /// Constructs a validated file payload.
    ///
    /// A blank `declared_mime_type` is stored as absent.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyFileName`] for a blank file name.
    /// Returns [`CoreError::FileTooLarge`] when `bytes` exceeds
    /// [`MAX_FILE_BYTES`].
    pub fn new(
        file_name: impl Into<String>,
        declared_mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(CoreError::EmptyFileName);
        }

        check_file_size(bytes.len() as u64)?;

        let declared_mime_type = declared_mime_type.filter(|mime| !mime.trim().is_empty());

        Ok(Self {
            file_name,
            declared_mime_type,
            bytes,
        })
    }

    /// Returns the original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the MIME type declared by the uploader, if any.
    pub fn declared_mime_type(&self) -> Option<&str> {
        self.declared_mime_type.as_deref()
    }

    /// Returns raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns file size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Primary content of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    /// Text-only scan.
    Text(TextPayload),
    /// File scan; free text, if any, travels as auxiliary context.
    File(FilePayload),
}

/// One validated, user-initiated scan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    payload: InputPayload,
    context: Option<String>,
}

impl AnalysisRequest {
    /// Builds a request from free text and an optional file.
    ///
    /// With a file, non-blank text becomes auxiliary context. Without a file,
    /// the text itself is the primary payload.
    ///
    /// # Errors
    /// Returns [`CoreError::TextTooLong`] when text exceeds [`MAX_TEXT_CHARS`].
    /// Returns [`CoreError::EmptyRequest`] when there is no file and the text
    /// is blank.
    pub fn new(text: impl Into<String>, file: Option<FilePayload>) -> Result<Self, CoreError> {
        let text = text.into();
        check_text_length(&text)?;
        let has_text = !text.trim().is_empty();

        match file {
            Some(file) => Ok(Self {
                payload: InputPayload::File(file),
                context: has_text.then_some(text),
            }),
            None if has_text => Ok(Self {
                payload: InputPayload::Text(TextPayload { content: text }),
                context: None,
            }),
            None => Err(CoreError::EmptyRequest),
        }
    }

    /// Returns the primary payload.
    pub fn payload(&self) -> &InputPayload {
        &self.payload
    }

    /// Returns the uploaded file, if the request carries one.
    pub fn file(&self) -> Option<&FilePayload> {
        match &self.payload {
            InputPayload::File(file) => Some(file),
            InputPayload::Text(_) => None,
        }
    }

    /// Returns the text appended to the instruction as additional context.
    ///
    /// For text-only requests this is the primary text.
    pub fn context_text(&self) -> Option<&str> {
        match &self.payload {
            InputPayload::Text(text) => Some(text.content.as_str()),
            InputPayload::File(_) => self.context.as_deref(),
        }
    }
}

/// Checks a file size against [`MAX_FILE_BYTES`].
///
/// Loaders call this with filesystem metadata before reading any bytes.
///
/// # Errors
/// Returns [`CoreError::FileTooLarge`] when `size` exceeds the limit.
pub fn check_file_size(size: u64) -> Result<(), CoreError> {
    if size > MAX_FILE_BYTES {
        return Err(CoreError::FileTooLarge {
            size,
            limit: MAX_FILE_BYTES,
        });
    }
    Ok(())
}

fn check_text_length(text: &str) -> Result<(), CoreError> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(CoreError::TextTooLong {
            chars,
            limit: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}

/// Local validation failures for scan inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Neither text nor file was supplied.
    #[error("input text or a file is required to start a scan")]
    EmptyRequest,
    /// Free text exceeds the character limit.
    #[error("text is {chars} characters; the limit is {limit}")]
    TextTooLong {
        /// Actual character count.
        chars: usize,
        /// Configured limit.
        limit: usize,
    },
    /// File exceeds the size limit.
    #[error("file is {size} bytes; the limit is {limit}")]
    FileTooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
    /// File name is blank.
    #[error("file name is empty")]
    EmptyFileName,
}
