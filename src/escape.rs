//! Filename escaping for hash input and display
//!
//! Names are escaped character by character so that a name can never smuggle
//! a line break or field separator into a directory's hash listing.

use crate::fs::escaped_byte;

/// Escape an entry name into its canonical, single-line representation.
///
/// Space, tab, carriage return, newline and backslash get short escapes.
/// Any other non-printable character becomes `\xNN`, `\uNNNN` or
/// `\UNNNNNNNN` depending on its code point, except bytes that were not
/// valid UTF-8 on disk, which show as `\udcNN`. Everything else is kept.
pub fn escape_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        ' ' => out.push_str("\\ "),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\n' => out.push_str("\\n"),
        '\\' => out.push_str("\\\\"),
        _ => match escaped_byte(ch) {
            Some(byte) => out.push_str(&format!("\\udc{:02x}", byte)),
            None if is_printable(ch) => out.push(ch),
            None => {
                let code = ch as u32;
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
        },
    }
}

/// Whether a character is printable: not a control, format, surrogate,
/// private-use, unassigned or separator character (ASCII space excepted).
fn is_printable(ch: char) -> bool {
    if ch == '\'' || ch == '"' {
        return true;
    }
    // A leading character keeps combining marks from being escaped.
    let mut sample = String::with_capacity(8);
    sample.push('a');
    sample.push(ch);
    sample.escape_debug().skip(1).eq(std::iter::once(ch))
}
