//! XML text escaping applied at admission time.
//!
//! Only the characters that are unsafe inside XML text content are touched:
//! `&`, `<`, `>` and `"` become entities, and control characters that XML 1.0
//! forbids outright are replaced with U+FFFD. Tab, newline and carriage
//! return are legal and pass through.
//!
//! Escaping is not idempotent: `&amp;` escapes to `&amp;amp;`. Records are
//! escaped once, when admitted, and the stored form is what the cache keeps.

use std::borrow::Cow;

/// Escape `text` for use inside XML text content.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if is_disallowed_control(c) => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"') || is_disallowed_control(c)
}

fn is_disallowed_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}')
}
