//! Escape tables and quoting rules shared by the parser and the renderer.

use crate::literal::{is_numeric_literal, is_reserved_word};

/// Map a character to its single-letter escape, if it has one.
#[inline]
pub(crate) fn escape_letter(c: char) -> Option<char> {
    match c {
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\0' => Some('0'),
        '\x07' => Some('a'),
        '\x08' => Some('b'),
        '\x1b' => Some('e'),
        '\x0c' => Some('f'),
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\t' => Some('t'),
        '\x0b' => Some('v'),
        _ => None,
    }
}

/// Resolve a single-letter escape read inside a string.
///
/// Digits and `x`/`u`/`U` are numeric escapes and are handled by the parser.
#[inline]
pub(crate) fn resolve_letter(letter: char) -> Option<char> {
    match letter {
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'e' => Some('\x1b'),
        'f' => Some('\x0c'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0b'),
        _ => None,
    }
}

/// Characters that end or delimit a bare token.
#[inline]
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | '"' | '\'' | '\\' | ';')
}

/// Characters skipped between tokens and trimmed off bare tokens.
#[inline]
pub(crate) fn is_ignorable(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// Whether a string tag must be quoted to re-parse as the same string.
pub(crate) fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || is_reserved_word(text)
        || is_numeric_literal(text)
        || text.chars().any(|c| is_delimiter(c) || is_ignorable(c))
}

/// Append `text` wrapped in double quotes with escapes applied.
pub(crate) fn write_quoted(out: &mut String, text: &str) {
    out.reserve(text.len() + 2);
    out.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        // `\0` followed by an octal digit would be read back as one escape.
        if c == '\0' && chars.peek().is_some_and(|next| next.is_digit(8)) {
            out.push_str("\\x00");
        } else if let Some(letter) = escape_letter(c) {
            out.push('\\');
            out.push(letter);
        } else if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') {
            push_code_escape(out, c);
        } else {
            out.push(c);
        }
    }
    out.push('"');
}

fn push_code_escape(out: &mut String, c: char) {
    use std::fmt::Write;

    let code = u32::from(c);
    // Writing into a String cannot fail.
    let _ = if code < 0x100 {
        write!(out, "\\x{code:02X}")
    } else {
        write!(out, "\\u{code:04X}")
    };
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
