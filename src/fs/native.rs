//! Native names as logical path strings
//!
//! Bytes that are not valid UTF-8 travel through logical paths as the code
//! points U+10FF80..=U+10FFFF, one per byte, the way Python's
//! `surrogateescape` carries them as U+DC80..=U+DCFF. They turn back into
//! the same bytes for I/O, sort as their surrogate counterparts and are
//! displayed as `\udcNN`.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;

const BYTE_BASE: u32 = 0x10FF00;
const SURROGATE_BASE: u32 = 0xDC00;

/// The raw byte an escaped code point stands for.
pub(crate) fn escaped_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    (BYTE_BASE + 0x80..=BYTE_BASE + 0xFF)
        .contains(&code)
        .then(|| (code - BYTE_BASE) as u8)
}

/// Code point used when ordering names: escaped bytes rank as the lone
/// surrogates they replace.
pub(crate) fn order_key(ch: char) -> u32 {
    match escaped_byte(ch) {
        Some(byte) => SURROGATE_BASE + u32::from(byte),
        None => ch as u32,
    }
}

#[cfg(unix)]
fn byte_char(byte: u8) -> char {
    char::from_u32(BYTE_BASE + u32::from(byte)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Decode name bytes, escaping each byte of every invalid UTF-8 sequence.
#[cfg(unix)]
fn decode_bytes(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let bad = e.error_len().unwrap_or(rest.len());
                out.extend(rest[..bad].iter().map(|&b| byte_char(b)));
                bytes = &rest[bad..];
            }
        }
    }
}

/// Logical form of a name read from the filesystem.
#[cfg(unix)]
pub(crate) fn decode_name(name: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    decode_bytes(name.as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn decode_name(name: &OsStr) -> String {
    name.to_string_lossy().into_owned()
}

/// Filesystem path for a logical path, restoring escaped bytes.
#[cfg(unix)]
pub(crate) fn native_path(path: &str) -> Cow<'_, Path> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    if !path.chars().any(|ch| escaped_byte(ch).is_some()) {
        return Cow::Borrowed(Path::new(path));
    }
    let mut bytes = Vec::with_capacity(path.len());
    let mut buf = [0u8; 4];
    for ch in path.chars() {
        match escaped_byte(ch) {
            Some(byte) => bytes.push(byte),
            None => bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes()),
        }
    }
    Cow::Owned(OsString::from_vec(bytes).into())
}

#[cfg(not(unix))]
pub(crate) fn native_path(path: &str) -> Cow<'_, Path> {
    Cow::Borrowed(Path::new(path))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::ffi::OsStrExt;

    #[test]
    fn test_valid_names_unchanged() {
        assert_eq!(decode_bytes(b"plain.txt"), "plain.txt");
        assert_eq!(decode_bytes("über".as_bytes()), "über");
        assert!(matches!(native_path("a/b"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_bytes_escaped_one_by_one() {
        let decoded = decode_bytes(b"bad\xff\xfe.txt");
        let escaped: Vec<Option<u8>> = decoded.chars().map(escaped_byte).collect();
        assert_eq!(escaped[3], Some(0xff));
        assert_eq!(escaped[4], Some(0xfe));
        assert!(decoded.ends_with(".txt"));
        assert_eq!(decoded.chars().count(), 9);
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        // First two bytes of a three-byte sequence.
        let decoded = decode_bytes(b"x\xe2\x82");
        let bytes: Vec<Option<u8>> = decoded.chars().skip(1).map(escaped_byte).collect();
        assert_eq!(bytes, [Some(0xe2), Some(0x82)]);
    }

    #[test]
    fn test_distinct_bytes_stay_distinct() {
        assert_ne!(decode_bytes(b"a\xff"), decode_bytes(b"a\xfe"));
    }

    #[test]
    fn test_native_path_restores_bytes() {
        let raw: &[u8] = b"dir/bad\xff";
        let logical = decode_bytes(raw);
        assert_eq!(native_path(&logical).as_os_str().as_bytes(), raw);
    }

    #[test]
    fn test_order_key_matches_surrogates() {
        let escaped = byte_char(0xff);
        assert_eq!(order_key(escaped), 0xdcff);
        assert!(order_key(escaped) < order_key('\u{e000}'));
        assert!(order_key(escaped) > order_key('z'));
    }
}
