//! Format validation — pure MIME/size classification of an upload.
//!
//! No I/O and no sniffing of file contents; classification is by the
//! declared MIME type, with one pragmatic exception for PDFs delivered as
//! generic octet-stream by browsers.

use crate::extraction::{ExtractError, SourceFile};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Default upload cap: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// The supported document formats, decided once per upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

/// Classifies a file by declared MIME type and checks the size cap.
pub fn classify(file: &SourceFile, max_bytes: usize) -> Result<FileKind, ExtractError> {
    let kind = match file.mime_type.as_str() {
        PDF_MIME => FileKind::Pdf,
        DOCX_MIME => FileKind::Docx,
        TEXT_MIME => FileKind::PlainText,
        // Browsers sometimes upload PDFs as octet-stream; trust the extension.
        OCTET_STREAM_MIME if has_pdf_extension(&file.file_name) => FileKind::Pdf,
        other => {
            return Err(ExtractError::InvalidFormat {
                mime_type: other.to_string(),
            })
        }
    };

    let size = file.bytes.len();
    if size > max_bytes {
        return Err(ExtractError::FileTooLarge {
            size,
            max: max_bytes,
        });
    }

    Ok(kind)
}

fn has_pdf_extension(file_name: &str) -> bool {
    file_name
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
