use std::borrow::Cow;

use log::warn;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding a track was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

/// Decodes raw file contents. UTF-8 is used when the bytes are valid UTF-8,
/// Latin-1 otherwise.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, Encoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), Encoding::Utf8),
        Err(err) => {
            warn!(
                "Input is not valid UTF-8 (at byte {}), reading it as Latin-1",
                err.valid_up_to()
            );
            (Cow::Owned(latin1_to_string(bytes)), Encoding::Latin1)
        }
    }
}

pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Reads the bytes of `text` as if they were Latin-1.
pub fn reinterpret_as_latin1(text: &str) -> String {
    latin1_to_string(text.as_bytes())
}
