//! Charset sniffing and decoding of raw page bytes.
//!
//! Saved pages usually declare their charset in a `<meta>` tag near the top.
//! Only the first 1024 bytes are inspected; anything undeclared is read as
//! UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;/]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>;]+)"#)
        .expect("valid regex")
});

/// Page text after decoding.
#[derive(Debug, Clone)]
pub struct Decoded<'a> {
    /// UTF-8 text. Borrowed when the input already was valid UTF-8.
    pub text: Cow<'a, str>,
    /// Encoding the bytes were read as.
    pub encoding: &'static Encoding,
    /// Whether any byte sequence had to be replaced with U+FFFD.
    pub had_errors: bool,
}

/// Find the charset declared in the head of `bytes`, defaulting to UTF-8.
///
/// A byte-order mark wins over any declaration. A `<meta>` cannot switch
/// the page to UTF-16 or the replacement encoding: the bytes were readable
/// as ASCII to find the declaration, so those labels fall back to UTF-8.
#[must_use]
pub fn sniff(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);

    [&*META_CHARSET, &*HTTP_EQUIV_CHARSET]
        .into_iter()
        .filter_map(|re| re.captures(&head))
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_str().as_bytes()))
        .map_or(UTF_8, Encoding::output_encoding)
}

/// Decode `bytes` with the sniffed encoding.
///
/// Invalid sequences become U+FFFD instead of failing.
///
/// ```
/// use fair_attendance::encoding::decode;
///
/// let page = decode(b"<meta charset=\"windows-1252\"><td>Caf\xE9</td>");
/// assert!(page.text.contains("Café"));
/// assert_eq!(page.encoding.name(), "windows-1252");
/// ```
#[must_use]
pub fn decode(bytes: &[u8]) -> Decoded<'_> {
    let encoding = sniff(bytes);
    let (text, encoding, had_errors) = encoding.decode(bytes);
    Decoded {
        text,
        encoding,
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_defaults_to_utf8() {
        assert_eq!(sniff(b"<html><body>Attendance</body></html>"), UTF_8);
    }

    #[test]
    fn meta_charset_is_honored() {
        let bytes = br#"<html><head><meta charset="ISO-8859-1"></head></html>"#;
        // WHATWG maps latin1 labels onto windows-1252
        assert_eq!(sniff(bytes).name(), "windows-1252");
    }

    #[test]
    fn unquoted_uppercase_meta_charset() {
        assert_eq!(sniff(b"<HEAD><META CHARSET=Shift_JIS></HEAD>").name(), "Shift_JIS");
    }

    #[test]
    fn http_equiv_charset_is_honored() {
        let bytes = br#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1251">"#;
        assert_eq!(sniff(bytes).name(), "windows-1251");
    }

    #[test]
    fn meta_declared_utf16_is_read_as_utf8() {
        let bytes = br#"<meta charset="utf-16"><p>Friday 61,030</p>"#;
        assert_eq!(sniff(bytes), UTF_8);
        assert!(decode(bytes).text.contains("Friday 61,030"));
    }

    #[test]
    fn meta_declared_replacement_is_read_as_utf8() {
        let bytes = br#"<meta charset="iso-2022-kr"><p>Saturday</p>"#;
        assert_eq!(sniff(bytes), UTF_8);
        assert!(decode(bytes).text.contains("Saturday"));
    }

    #[test]
    fn utf16_bom_is_still_honored() {
        assert_eq!(sniff(b"\xFF\xFE<\x00p\x00>\x00").name(), "UTF-16LE");
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        assert_eq!(sniff(br#"<meta charset="no-such-charset">"#), UTF_8);
    }

    #[test]
    fn declaration_past_sniff_window_is_ignored() {
        let mut bytes = vec![b' '; SNIFF_LEN];
        bytes.extend_from_slice(br#"<meta charset="windows-1252">"#);
        assert_eq!(sniff(&bytes), UTF_8);
    }

    #[test]
    fn utf8_input_is_borrowed() {
        let page = decode("<p>Thursday 96,452</p>".as_bytes());
        assert!(matches!(page.text, Cow::Borrowed(_)));
        assert!(!page.had_errors);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let page = decode(b"\xEF\xBB\xBF<p>Total</p>");
        assert_eq!(page.text, "<p>Total</p>");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let page = decode(b"<p>Day \xFF\xFE 3</p>");
        assert!(page.had_errors);
        assert!(page.text.contains('\u{FFFD}'));
        assert!(page.text.contains("Day"));
    }

    #[test]
    fn windows1252_quotes_decode() {
        let page = decode(b"<meta charset=\"windows-1252\"><p>\x93Fair\x94</p>");
        assert!(page.text.contains("\u{201C}Fair\u{201D}"));
    }
}
