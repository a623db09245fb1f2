//! Backslash escape decoding for completed string tokens.
//!
//! Decoding runs over a finished token in one pass, after the closing quote
//! has been seen. The result lands in a scratch buffer, so stored strings are
//! written exactly once.

use alloc::{string::String, vec::Vec};

use crate::error::SequenceError;

/// Decodes the bytes between a string's quotes into an owned string.
///
/// Recognises `\\` `\/` `\"` `\t` `\f` `\r` `\n` and `\uXXXX` for code points
/// up to U+FFFF. U+0000 and unpaired surrogates are rejected.
pub(crate) fn unescape(raw: &[u8]) -> Result<String, SequenceError> {
    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        i += 1;
        if b != b'\\' {
            out.push(b);
            continue;
        }

        let esc = *raw.get(i).ok_or(SequenceError::BadEscape)?;
        i += 1;
        match esc {
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'"' => out.push(b'"'),
            b't' => out.push(b'\t'),
            b'f' => out.push(0x0c),
            b'r' => out.push(b'\r'),
            b'n' => out.push(b'\n'),
            b'u' => {
                let hex = raw.get(i..i + 4).ok_or(SequenceError::BadEscape)?;
                i += 4;
                let code = decode_hex4(hex)?;
                if code == 0 {
                    return Err(SequenceError::BadEscape);
                }
                let ch = char::from_u32(u32::from(code)).ok_or(SequenceError::BadEscape)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            _ => return Err(SequenceError::BadEscape),
        }
    }

    String::from_utf8(out).map_err(|_| SequenceError::BadUtf8)
}

fn decode_hex4(hex: &[u8]) -> Result<u16, SequenceError> {
    let mut code: u16 = 0;
    for &b in hex {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(SequenceError::BadEscape),
        };
        code = (code << 4) | u16::from(digit);
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::unescape;
    use crate::error::SequenceError;

    // Builds the token bytes for a backslash-u escape with the given digits.
    fn u_escape(hex: &str) -> Vec<u8> {
        let mut raw = Vec::from(&b"\\u"[..]);
        raw.extend_from_slice(hex.as_bytes());
        raw
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(unescape(b"hello world").unwrap(), "hello world");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(unescape(br#"a\tb\nc\rd\\e\/f\"x"#).unwrap(), "a\tb\nc\rd\\e/f\"x");
        assert_eq!(unescape(br"form\ffeed").unwrap(), "form\u{c}feed");
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(unescape(&u_escape("0041")).unwrap(), "A");
        assert_eq!(unescape(&u_escape("00e9")).unwrap(), "\u{e9}");
        assert_eq!(unescape(&u_escape("20AC")).unwrap(), "\u{20ac}");
    }

    #[test]
    fn backspace_escape_is_not_supported() {
        assert_eq!(unescape(br"\b"), Err(SequenceError::BadEscape));
    }

    #[test]
    fn rejects_malformed_escapes() {
        assert_eq!(unescape(br"\q"), Err(SequenceError::BadEscape));
        assert_eq!(unescape(br"\u12"), Err(SequenceError::BadEscape));
        assert_eq!(unescape(br"\u12gz"), Err(SequenceError::BadEscape));
        assert_eq!(unescape(b"\\"), Err(SequenceError::BadEscape));
    }

    #[test]
    fn rejects_nul_and_lone_surrogates() {
        assert_eq!(unescape(&u_escape("0000")), Err(SequenceError::BadEscape));
        assert_eq!(unescape(br"\ud800"), Err(SequenceError::BadEscape));
        assert_eq!(unescape(br"\udfff"), Err(SequenceError::BadEscape));
    }

    #[test]
    fn raw_invalid_utf8_is_rejected() {
        assert_eq!(unescape(b"ok \xff\\t"), Err(SequenceError::BadUtf8));
    }
}
