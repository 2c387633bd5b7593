//! Document text extraction — turns an uploaded resume file into clean
//! plain text.
//!
//! Flow: classify (MIME + size) → format-specific extractor → normalize.
//! Every failure crosses this boundary as a typed [`ExtractError`] so the
//! handler can render a specific remediation message per kind; nothing
//! panics past here.

use bytes::Bytes;
use thiserror::Error;

pub mod docx;
pub mod handlers;
pub mod normalize;
pub mod pdf;
pub mod validate;

use validate::FileKind;

/// An uploaded file as received at the boundary: raw bytes plus the
/// declared MIME type and file name. Validated once, never mutated.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: String,
}

/// Successful extraction: normalized text plus the PDF page count
/// (0 for DOCX and plain text, which have no page model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub page_count: usize,
}

/// Classified extraction failure. Each kind carries distinct remediation
/// copy; none of them is ever retried (a structurally bad file cannot
/// improve on a second attempt).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {mime_type}")]
    InvalidFormat { mime_type: String },

    #[error("file is {size} bytes, maximum is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("document is password protected")]
    PasswordProtected,

    #[error("document could not be parsed: {0}")]
    CorruptDocument(String),

    #[error("document contains no pages")]
    EmptyDocument,

    #[error("document contains no extractable text")]
    NoExtractableText,
}

impl ExtractError {
    /// Stable machine-readable code for the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::InvalidFormat { .. } => "INVALID_FORMAT",
            ExtractError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ExtractError::PasswordProtected => "PASSWORD_PROTECTED",
            ExtractError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            ExtractError::EmptyDocument => "EMPTY_DOCUMENT",
            ExtractError::NoExtractableText => "NO_EXTRACTABLE_TEXT",
        }
    }

    /// Remediation copy shown to the caller alongside the error.
    pub fn remediation(&self) -> &'static str {
        match self {
            ExtractError::InvalidFormat { .. } => "Upload a PDF, DOCX, or TXT file.",
            ExtractError::FileTooLarge { .. } => "Upload a file smaller than the size limit.",
            ExtractError::PasswordProtected => {
                "Remove the password from the document and upload it again."
            }
            ExtractError::CorruptDocument(_) => {
                "The file could not be read. Re-upload a valid document."
            }
            ExtractError::EmptyDocument => "The document appears to be empty.",
            ExtractError::NoExtractableText => {
                "This looks like a scanned document. Paste your resume text manually instead."
            }
        }
    }
}

/// Dispatches a validated file to the extractor for its format and
/// normalizes the result.
pub fn extract(file: &SourceFile, max_bytes: usize) -> Result<Extracted, ExtractError> {
    let kind = validate::classify(file, max_bytes)?;

    let extracted = match kind {
        FileKind::Pdf => pdf::extract_pdf(&file.bytes)?,
        FileKind::Docx => Extracted {
            text: docx::extract_docx(&file.bytes)?,
            page_count: 0,
        },
        FileKind::PlainText => {
            let text = String::from_utf8_lossy(&file.bytes);
            if text.trim().is_empty() {
                return Err(ExtractError::EmptyDocument);
            }
            Extracted {
                text: text.into_owned(),
                page_count: 0,
            }
        }
    };

    Ok(Extracted {
        text: normalize::normalize(&extracted.text),
        page_count: extracted.page_count,
    })
}
