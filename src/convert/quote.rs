//! SQL identifier and string literal quoting.
//!
//! Identifiers are wrapped in backticks verbatim. String literals use
//! double quotes with C-style backslash escapes: printable characters pass through,
//! quotes and backslashes are escaped, control characters use their short
//! escape when one exists, and everything else becomes a `\x`, `\u` or `\U`
//! hex escape. Invalid UTF-8 is escaped byte by byte.

use unicode_general_category::{GeneralCategory, get_general_category};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `name` wrapped in backticks.
///
/// Embedded backticks are not escaped.
///
/// # Example
///
/// ```
/// use csv2sql::convert::quote_identifier;
///
/// let mut buf = Vec::new();
/// quote_identifier(&mut buf, b"first name");
/// assert_eq!(buf, b"`first name`");
/// ```
pub fn quote_identifier(buf: &mut Vec<u8>, name: &[u8]) {
    buf.reserve(name.len() + 2);
    buf.push(b'`');
    buf.extend_from_slice(name);
    buf.push(b'`');
}

/// Append `value` as a double-quoted, backslash-escaped string literal.
///
/// # Example
///
/// ```
/// use csv2sql::convert::quote_string;
///
/// let mut buf = Vec::new();
/// quote_string(&mut buf, b"Smith, \"Jr.\"");
/// assert_eq!(buf, br#""Smith, \"Jr.\"""#);
/// ```
pub fn quote_string(buf: &mut Vec<u8>, value: &[u8]) {
    buf.reserve(value.len() + 2);
    buf.push(b'"');
    for chunk in value.utf8_chunks() {
        for ch in chunk.valid().chars() {
            push_escaped_char(buf, ch);
        }
        for &byte in chunk.invalid() {
            push_hex(buf, b'x', byte as u32, 2);
        }
    }
    buf.push(b'"');
}

fn push_escaped_char(buf: &mut Vec<u8>, ch: char) {
    match ch {
        '"' => buf.extend_from_slice(b"\\\""),
        '\\' => buf.extend_from_slice(b"\\\\"),
        _ if is_printable(ch) => {
            let mut utf8 = [0u8; 4];
            buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        }
        '\x07' => buf.extend_from_slice(b"\\a"),
        '\x08' => buf.extend_from_slice(b"\\b"),
        '\x0c' => buf.extend_from_slice(b"\\f"),
        '\n' => buf.extend_from_slice(b"\\n"),
        '\r' => buf.extend_from_slice(b"\\r"),
        '\t' => buf.extend_from_slice(b"\\t"),
        '\x0b' => buf.extend_from_slice(b"\\v"),
        _ => {
            let code = ch as u32;
            if code < 0x20 || code == 0x7f {
                push_hex(buf, b'x', code, 2);
            } else if code < 0x10000 {
                push_hex(buf, b'u', code, 4);
            } else {
                push_hex(buf, b'U', code, 8);
            }
        }
    }
}

fn push_hex(buf: &mut Vec<u8>, marker: u8, code: u32, digits: u32) {
    buf.push(b'\\');
    buf.push(marker);
    for shift in (0..digits).rev() {
        buf.push(HEX[((code >> (shift * 4)) & 0xf) as usize]);
    }
}

/// Whether `ch` is rendered as-is inside a string literal.
///
/// Letters, marks, numbers, punctuation, symbols and ASCII space are
/// printable. Other separators, controls, format, private-use, surrogate
/// and unassigned code points are escaped.
pub(crate) fn is_printable(ch: char) -> bool {
    use GeneralCategory::*;

    ch == ' '
        || matches!(
            get_general_category(ch),
            UppercaseLetter
                | LowercaseLetter
                | TitlecaseLetter
                | ModifierLetter
                | OtherLetter
                | NonspacingMark
                | SpacingMark
                | EnclosingMark
                | DecimalNumber
                | LetterNumber
                | OtherNumber
                | ConnectorPunctuation
                | DashPunctuation
                | OpenPunctuation
                | ClosePunctuation
                | InitialPunctuation
                | FinalPunctuation
                | OtherPunctuation
                | MathSymbol
                | CurrencySymbol
                | ModifierSymbol
                | OtherSymbol
        )
}
