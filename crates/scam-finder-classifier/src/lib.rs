#![warn(missing_docs)]
//! # scam-finder-classifier
//!
//! ## Purpose
//! Maps an uploaded file onto the content category that decides how its bytes
//! are framed in the analysis prompt.
//!
//! ## Responsibilities
//! - Derive a [`ContentCategory`] and normalized MIME type from file name and
//!   declared MIME type with one ordered rule table.
//! - Describe the upload filters offered to users ([`AcceptFilter`]).
//!
//! ## Data flow
//! [`scam_finder_core::AnalysisRequest`] -> [`classify_request`] -> [`Classification`]
//! -> prompt assembly.
//!
//! ## Error model
//! Classification cannot fail. Unknown inputs fall back to
//! [`ContentCategory::GenericDocument`] with `application/octet-stream`.
//!
//! ## Security and privacy notes
//! Classification never inspects file bytes; it is a pure function of two
//! strings.

use scam_finder_core::AnalysisRequest;

/// Normalized MIME type for Outlook/EML email containers.
pub const MIME_EMAIL_CONTAINER: &str = "application/vnd.ms-outlook";

/// Normalized MIME type for HTML sources.
pub const MIME_HTML: &str = "text/html";

/// Fallback MIME type when nothing better is known.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Image extensions recognized when no MIME type was declared.
pub const IMAGE_EXTENSIONS: [(&str, &str); 10] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("ico", "image/x-icon"),
];

/// How file content is framed in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    /// Raster image; gets the AI-forensics checklist.
    Image,
    /// HTML/web page source; sent as decoded text when possible.
    HtmlSource,
    /// `.msg`/`.eml` email container.
    EmailContainer,
    /// Anything else (PDF, Office, plain text, unknown).
    GenericDocument,
    /// No file in the request.
    None,
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Derived category.
    pub category: ContentCategory,
    /// MIME type sent alongside inline bytes.
    pub mime_type: String,
}

impl Classification {
    /// Classification for requests that carry no file.
    pub fn none() -> Self {
        Self {
            category: ContentCategory::None,
            mime_type: String::new(),
        }
    }
}

/// Classifies a file from its name and declared MIME type.
///
/// Rules, first match wins:
/// 1. `msg`/`eml` extension -> email container.
/// 2. `html`/`htm` extension -> HTML source.
/// 3. Declared MIME type present -> used verbatim; image if it starts with
///    `image/`, generic document otherwise.
/// 4. Extension found in [`IMAGE_EXTENSIONS`] -> image.
/// 5. Generic document with [`MIME_OCTET_STREAM`].
pub fn classify(file_name: &str, declared_mime_type: Option<&str>) -> Classification {
    let extension = file_extension(file_name);
    let declared = declared_mime_type.filter(|mime| !mime.trim().is_empty());

    match (extension.as_str(), declared) {
        ("msg" | "eml", _) => classification(ContentCategory::EmailContainer, MIME_EMAIL_CONTAINER),
        ("html" | "htm", _) => classification(ContentCategory::HtmlSource, MIME_HTML),
        (_, Some(mime)) if mime.starts_with("image/") => {
            classification(ContentCategory::Image, mime)
        }
        (_, Some(mime)) => classification(ContentCategory::GenericDocument, mime),
        (ext, None) => match image_mime_for_extension(ext) {
            Some(mime) => classification(ContentCategory::Image, mime),
            None => classification(ContentCategory::GenericDocument, MIME_OCTET_STREAM),
        },
    }
}

/// Classifies the file carried by `request`, or returns
/// [`Classification::none`] for text-only requests.
pub fn classify_request(request: &AnalysisRequest) -> Classification {
    request
        .file()
        .map(|file| classify(file.file_name(), file.declared_mime_type()))
        .unwrap_or_else(Classification::none)
}

/// Returns the lowercased text after the last `.` of `file_name`.
///
/// A name without any `.` is returned whole, lowercased.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Looks up the canonical image MIME type for an extension.
pub fn image_mime_for_extension(extension: &str) -> Option<&'static str> {
    IMAGE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

fn classification(category: ContentCategory, mime_type: &str) -> Classification {
    Classification {
        category,
        mime_type: mime_type.to_string(),
    }
}

/// Upload filter offered in the file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptFilter {
    /// Every supported upload type.
    #[default]
    All,
    /// Images only.
    Images,
    /// Office documents, PDF, and plain text.
    Documents,
    /// HTML sources and email containers.
    Web,
}

const IMAGE_UPLOAD_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "heic", "heif", "bmp", "tiff", "tif",
];
const DOCUMENT_UPLOAD_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt"];
const WEB_UPLOAD_EXTENSIONS: &[&str] = &["msg", "html", "htm", "eml"];

impl AcceptFilter {
    /// Browser `accept` attribute for this filter.
    pub fn accept_attribute(self) -> &'static str {
        match self {
            Self::All => {
                "image/*,.heic,.heif,.webp,.bmp,.tiff,.tif,application/pdf,.docx,.doc,.xlsx,.xls,.pptx,.ppt,.txt,.msg,.html,.htm,.eml"
            }
            Self::Images => "image/*,.heic,.heif,.webp,.bmp,.tiff,.tif",
            Self::Documents => "application/pdf,.docx,.doc,.xlsx,.xls,.pptx,.ppt,.txt",
            Self::Web => ".msg,.html,.htm,.eml",
        }
    }

    /// Returns `true` when a file passes this filter.
    ///
    /// This is a picker convenience only; classification ignores it.
    pub fn accepts(self, file_name: &str, declared_mime_type: Option<&str>) -> bool {
        let extension = file_extension(file_name);
        let mime = declared_mime_type.unwrap_or_default();

        let image =
            mime.starts_with("image/") || IMAGE_UPLOAD_EXTENSIONS.contains(&extension.as_str());
        let document =
            mime == "application/pdf" || DOCUMENT_UPLOAD_EXTENSIONS.contains(&extension.as_str());
        let web = WEB_UPLOAD_EXTENSIONS.contains(&extension.as_str());

        match self {
            Self::All => image || document || web,
            Self::Images => image,
            Self::Documents => document,
            Self::Web => web,
        }
    }
}
