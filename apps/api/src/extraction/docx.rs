//! DOCX text extraction.
//!
//! A DOCX package is a zip archive; the document body lives in
//! `word/document.xml` with text nodes already in document order, so no
//! layout reconstruction is needed — paragraphs map to newlines, tabs to
//! spaces, explicit breaks to newlines.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::extraction::ExtractError;

/// Extracts trimmed text from DOCX bytes.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::CorruptDocument(format!("not a DOCX package: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::CorruptDocument(format!("missing document body: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| ExtractError::CorruptDocument(format!("unreadable document body: {e}")))?;

    let text = text_from_document_xml(&document_xml)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::NoExtractableText);
    }
    Ok(trimmed.to_string())
}

/// Streams through the WordprocessingML body collecting `w:t` text nodes.
fn text_from_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_node = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_node = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push(' '),
                b"br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_node => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::CorruptDocument(format!("bad XML text: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::CorruptDocument(format!(
                    "malformed document XML: {e}"
                )))
            }
            Ok(_) => {}
        }
    }

    Ok(out)
}
