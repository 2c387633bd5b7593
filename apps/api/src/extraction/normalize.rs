//! Text normalization — collapses the whitespace noise extractors produce
//! into a clean paragraph stream.
//!
//! Rules: runs of 3+ newlines become exactly 2 (a paragraph boundary),
//! any other whitespace run becomes a single space, and the ends are
//! trimmed. The function is idempotent.

/// Normalizes raw extracted text. Single pass, no allocation beyond the
/// output buffer.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut pending_newlines = 0usize;
    let mut pending_space = false;

    for ch in unified.chars() {
        if ch == '\n' {
            pending_newlines += 1;
            pending_space = false;
        } else if ch.is_whitespace() {
            // Spaces and tabs around a line break fold into it.
            if pending_newlines == 0 {
                pending_space = true;
            }
        } else {
            if !out.is_empty() {
                if pending_newlines >= 3 {
                    out.push_str("\n\n");
                } else if pending_newlines > 0 {
                    for _ in 0..pending_newlines {
                        out.push('\n');
                    }
                } else if pending_space {
                    out.push(' ');
                }
            }
            pending_newlines = 0;
            pending_space = false;
            out.push(ch);
        }
    }

    out
}
