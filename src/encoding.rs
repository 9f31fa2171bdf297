use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;
use xhtmlchardet::detect;

use crate::error::{Error, ParseError};

/// Detect the encoding of raw XML: byte order mark first, then the XML
/// declaration, then sniffing. Without any clue it's UTF-8.
pub(crate) fn detect_encoding(data: &[u8]) -> Result<&'static Encoding, Error> {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return Ok(encoding);
    }
    let mut cursor = std::io::Cursor::new(data);
    // reading from memory can't fail
    let charsets = detect(&mut cursor, None).unwrap_or_default();
    let Some(label) = charsets.first() else {
        return Ok(UTF_8);
    };
    Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::UnsupportedEncoding(label.clone()))
}

/// Decode raw XML into text, dropping any byte order mark.
pub(crate) fn decode(data: &[u8]) -> Result<Cow<'_, str>, Error> {
    let encoding = detect_encoding(data)?;
    debug!(encoding = encoding.name(), bytes = data.len(), "decoding XML input");
    let (text, had_errors) = encoding.decode_with_bom_removal(data);
    if had_errors {
        return Err(ParseError::Undecodable(encoding.name().to_string()).into());
    }
    Ok(text)
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Utf8,
    Utf16Le,
    Utf16Be,
    // encoding_rs treats ASCII labels as windows-1252 too
    Ascii,
    // encoding_rs treats ISO-8859-1 as windows-1252; we want the real thing
    Latin1,
    Other(&'static Encoding),
}

/// The encoding serialized output is written in.
///
/// Keeps the label as requested, which is what goes in the XML declaration.
#[derive(Debug, Clone)]
pub(crate) struct OutputEncoding {
    label: String,
    kind: Kind,
}

impl OutputEncoding {
    pub(crate) fn for_label(label: &str) -> Result<Self, Error> {
        let normalized = label.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Kind::Latin1,
            "us-ascii" | "ascii" => Kind::Ascii,
            "utf-16" | "utf-16be" => Kind::Utf16Be,
            "utf-16le" => Kind::Utf16Le,
            _ => {
                let encoding = Encoding::for_label(normalized.as_bytes())
                    .ok_or_else(|| Error::UnsupportedEncoding(label.to_string()))?;
                if encoding == UTF_8 {
                    Kind::Utf8
                } else if encoding.output_encoding() != encoding {
                    // encoding_rs can only decode this one
                    return Err(Error::UnsupportedEncoding(label.to_string()));
                } else {
                    Kind::Other(encoding)
                }
            }
        };
        Ok(OutputEncoding {
            label: label.to_string(),
            kind,
        })
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Whether this character can be written as-is.
    pub(crate) fn can_encode(&self, c: char) -> bool {
        match self.kind {
            Kind::Utf8 | Kind::Utf16Le | Kind::Utf16Be => true,
            Kind::Ascii => c.is_ascii(),
            Kind::Latin1 => (c as u32) <= 0xFF,
            Kind::Other(encoding) => {
                if c.is_ascii() {
                    return true;
                }
                let mut buf = [0u8; 4];
                let (_, _, had_errors) = encoding.encode(c.encode_utf8(&mut buf));
                !had_errors
            }
        }
    }

    /// Encode text. Anything not representable should have been escaped
    /// already.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self.kind {
            Kind::Utf8 => text.as_bytes().to_vec(),
            Kind::Utf16Be => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
            Kind::Utf16Le => {
                let mut bytes = vec![0xFF, 0xFE];
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
            Kind::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Kind::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
                .collect(),
            Kind::Other(encoding) => encoding.encode(text).0.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>";
        let enc = detect_encoding(data).unwrap();
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_utf8_without_declaration() {
        let data = b"<a/>";
        let enc = detect_encoding(data).unwrap();
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_iso8859_1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a/>";
        let enc = detect_encoding(data).unwrap();
        // windows-1252 is a superset of 8859-1
        assert_eq!(enc.name(), "windows-1252");
    }

    #[test]
    fn test_decode_latin1_bytes() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>caf\xe9</a>";
        let text = decode(data).unwrap();
        assert!(text.ends_with("<a>caf\u{e9}</a>"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let data = b"\xEF\xBB\xBF<a/>";
        assert_eq!(decode(data).unwrap(), "<a/>");
    }

    #[test]
    fn test_output_latin1() {
        let encoding = OutputEncoding::for_label("ISO-8859-1").unwrap();
        assert_eq!(encoding.label(), "ISO-8859-1");
        assert!(encoding.can_encode('\u{e9}'));
        assert!(!encoding.can_encode('\u{20ac}'));
        assert_eq!(encoding.encode("caf\u{e9}"), b"caf\xe9");
    }

    #[test]
    fn test_output_ascii() {
        let encoding = OutputEncoding::for_label("US-ASCII").unwrap();
        assert!(encoding.can_encode('a'));
        assert!(!encoding.can_encode('\u{e9}'));
    }

    #[test]
    fn test_output_utf16() {
        let encoding = OutputEncoding::for_label("UTF-16").unwrap();
        assert!(encoding.can_encode('\u{20ac}'));
        assert_eq!(encoding.encode("a"), vec![0xFE, 0xFF, 0x00, 0x61]);
    }

    #[test]
    fn test_output_other_encoding() {
        let encoding = OutputEncoding::for_label("windows-1251").unwrap();
        assert!(encoding.can_encode('\u{416}'));
        assert!(!encoding.can_encode('\u{e9}'));
    }

    #[test]
    fn test_output_unknown_encoding() {
        let err = OutputEncoding::for_label("no-such-encoding").unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(label) if label == "no-such-encoding"));
    }
}
