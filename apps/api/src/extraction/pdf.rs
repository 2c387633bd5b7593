//! PDF text extraction with reading-order reconstruction.
//!
//! PDF text runs carry no line or paragraph structure, so the extractor
//! interprets each page's content stream, tracking the text baseline y
//! coordinate through BT/Tm/Td/TD/TL/T*, and collects one run per show-text
//! operator. Runs whose baseline rounds to the same integer form a line;
//! lines are ordered by descending baseline (top of page first); runs within
//! a line keep encounter order and join with single spaces. Lines join with
//! a newline, pages with a blank line.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::extraction::{ExtractError, Extracted};

/// A positioned text run: decoded text plus its rounded baseline.
struct TextRun {
    baseline: i64,
    text: String,
}

/// Extracts reading-order text from PDF bytes.
pub fn extract_pdf(bytes: &[u8]) -> Result<Extracted, ExtractError> {
    let doc =
        Document::load_mem(bytes).map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;

    // Never attempt an encrypted document, not even with a blank password.
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(ExtractError::PasswordProtected);
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_id in pages.values() {
        let runs = collect_text_runs(&doc, *page_id)?;
        page_texts.push(assemble_page(runs));
    }

    // Pages parsed but not a single text run anywhere: a scanned or
    // image-only document, distinct from a document with no pages.
    if page_texts.iter().all(|text| text.trim().is_empty()) {
        return Err(ExtractError::NoExtractableText);
    }

    Ok(Extracted {
        text: page_texts.join("\n\n"),
        page_count: pages.len(),
    })
}

/// Walks one page's content stream and returns its text runs in encounter
/// order, each tagged with the baseline active when it was shown.
fn collect_text_runs(doc: &Document, page_id: ObjectId) -> Result<Vec<TextRun>, ExtractError> {
    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;
    let content = Content::decode(&content_data)
        .map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;

    let fonts = doc.get_page_fonts(page_id);
    let mut encoding: Option<&str> = None;
    let mut baseline = 0.0f64;
    let mut leading = 0.0f64;
    let mut runs = Vec::new();

    let mut push_run = |baseline: f64, text: String| {
        if !text.trim().is_empty() {
            runs.push(TextRun {
                baseline: baseline.round() as i64,
                text,
            });
        }
    };

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                baseline = 0.0;
                leading = 0.0;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    encoding = fonts.get(name).map(|font| font.get_font_encoding());
                }
            }
            // Text matrix: operand 5 is the absolute baseline y.
            "Tm" => {
                if let Some(ty) = op.operands.get(5).and_then(as_number) {
                    baseline = ty;
                }
            }
            "Td" => {
                if let Some(ty) = op.operands.get(1).and_then(as_number) {
                    baseline += ty;
                }
            }
            "TD" => {
                if let Some(ty) = op.operands.get(1).and_then(as_number) {
                    leading = -ty;
                    baseline += ty;
                }
            }
            "TL" => {
                if let Some(l) = op.operands.first().and_then(as_number) {
                    leading = l;
                }
            }
            "T*" => baseline -= leading,
            "Tj" => {
                if let Some(text) = decode_string(op.operands.first(), encoding) {
                    push_run(baseline, text);
                }
            }
            "'" => {
                baseline -= leading;
                if let Some(text) = decode_string(op.operands.first(), encoding) {
                    push_run(baseline, text);
                }
            }
            "\"" => {
                baseline -= leading;
                if let Some(text) = decode_string(op.operands.get(2), encoding) {
                    push_run(baseline, text);
                }
            }
            // TJ interleaves strings with kerning adjustments; the
            // adjustments are irrelevant to line grouping.
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let text: String = items
                        .iter()
                        .filter_map(|item| decode_string(Some(item), encoding))
                        .collect();
                    push_run(baseline, text);
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn decode_string(obj: Option<&Object>, encoding: Option<&str>) -> Option<String> {
    match obj {
        Some(Object::String(bytes, _)) => Some(Document::decode_text(encoding, bytes)),
        _ => None,
    }
}

/// Groups runs into lines by rounded baseline and renders the page:
/// descending baseline order, runs joined with spaces, lines with newlines.
fn assemble_page(runs: Vec<TextRun>) -> String {
    let mut lines: std::collections::BTreeMap<i64, Vec<String>> = std::collections::BTreeMap::new();
    for run in runs {
        lines.entry(run.baseline).or_default().push(run.text);
    }

    lines
        .into_iter()
        .rev()
        .map(|(_, texts)| texts.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream};

    /// Builds a minimal PDF with one content stream per page.
    fn build_pdf(pages_ops: Vec<Vec<Operation>>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages_ops {
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn show_text(y: Object, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), y]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_lines_ordered_by_descending_baseline() {
        // Runs emitted bottom line first; output must still read top-down.
        let mut ops = show_text(700.into(), "Experienced backend engineer.");
        ops.extend(show_text(720.into(), "John Doe"));
        let bytes = build_pdf(vec![ops]);

        let result = extract_pdf(&bytes).unwrap();
        assert_eq!(result.page_count, 1);
        assert_eq!(result.text, "John Doe\nExperienced backend engineer.");
    }

    #[test]
    fn test_runs_on_same_rounded_baseline_join_with_space() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Tm", vec![
                1.into(), 0.into(), 0.into(), 1.into(), 72.into(), Object::Real(700.2),
            ]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("Tm", vec![
                1.into(), 0.into(), 0.into(), 1.into(), 120.into(), Object::Real(699.8),
            ]),
            Operation::new("Tj", vec![Object::string_literal("World")]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![ops]);

        let result = extract_pdf(&bytes).unwrap();
        assert_eq!(result.text, "Hello World");
    }

    #[test]
    fn test_leading_driven_line_breaks() {
        // TD sets leading, T* advances to the next line.
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TD", vec![72.into(), 720.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Tj", vec![Object::string_literal("first line")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("second line")]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![ops]);

        let result = extract_pdf(&bytes).unwrap();
        assert_eq!(result.text, "first line\nsecond line");
    }

    #[test]
    fn test_tj_array_concatenates_ignoring_kerning() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("TJ", vec![Object::Array(vec![
                Object::string_literal("Hel"),
                (-20).into(),
                Object::string_literal("lo"),
            ])]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![ops]);

        let result = extract_pdf(&bytes).unwrap();
        assert_eq!(result.text, "Hello");
    }

    #[test]
    fn test_pages_joined_with_blank_line_and_counted() {
        let bytes = build_pdf(vec![
            show_text(700.into(), "page one"),
            show_text(700.into(), "page two"),
        ]);

        let result = extract_pdf(&bytes).unwrap();
        assert_eq!(result.page_count, 2);
        assert_eq!(result.text, "page one\n\npage two");
    }

    #[test]
    fn test_zero_pages_is_empty_document() {
        let bytes = build_pdf(vec![]);
        assert!(matches!(
            extract_pdf(&bytes),
            Err(ExtractError::EmptyDocument)
        ));
    }

    #[test]
    fn test_pages_without_text_runs_is_no_extractable_text() {
        // Two parseable pages, neither shows any text — the scanned-PDF case.
        let empty_page = vec![
            Operation::new("BT", vec![]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![empty_page.clone(), empty_page]);

        assert!(matches!(
            extract_pdf(&bytes),
            Err(ExtractError::NoExtractableText)
        ));
    }

    #[test]
    fn test_garbage_bytes_is_corrupt_document() {
        assert!(matches!(
            extract_pdf(b"definitely not a pdf"),
            Err(ExtractError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut ops = show_text(680.into(), "third");
        ops.extend(show_text(720.into(), "first"));
        ops.extend(show_text(700.into(), "second"));
        let bytes = build_pdf(vec![ops]);

        let a = extract_pdf(&bytes).unwrap();
        let b = extract_pdf(&bytes).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.text, "first\nsecond\nthird");
    }
}
