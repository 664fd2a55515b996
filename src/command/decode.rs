//! Decoding of raw command output.
//!
//! Windows tools print in the console code page, which varies by locale
//! (GBK on Chinese systems), while some emit UTF-16. Decoding tries, in order:
//!
//! 1. UTF-16/UTF-8 when a byte-order mark is present
//! 2. UTF-16LE when the bytes look like little-endian ASCII
//! 3. Strict UTF-8
//! 4. The configured fallback encoding, with lossy replacement
//!
//! Lost characters in free-text fields are acceptable; the line structure
//! that extractors depend on is always preserved.

use encoding_rs::{Encoding, GBK, UTF_16LE};

/// Default fallback when output is not valid UTF-8.
pub const DEFAULT_FALLBACK: &Encoding = GBK;

/// Resolves an encoding label such as `"gbk"` or `"windows-1252"`.
#[must_use]
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decodes raw output bytes into text with `\n` line endings.
#[must_use]
pub fn decode(bytes: &[u8], fallback: &'static Encoding) -> String {
    let text = if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        encoding
            .decode_without_bom_handling(&bytes[bom_len..])
            .0
            .into_owned()
    } else if looks_like_utf16le(bytes) {
        UTF_16LE.decode_without_bom_handling(bytes).0.into_owned()
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        text.to_owned()
    } else {
        let (text, had_errors) = fallback.decode_without_bom_handling(bytes);
        if had_errors {
            tracing::debug!(
                "Output was not clean {}; some characters were replaced",
                fallback.name()
            );
        }
        text.into_owned()
    };

    normalize_newlines(&text)
}

/// Converts CRLF (and the `\r\r\n` that wmic emits) to `\n`.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// BOM-less UTF-16LE heuristic: ASCII text leaves every odd byte zero.
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.len() < 4 || bytes.len() % 2 != 0 {
        return false;
    }
    let odd = bytes.iter().skip(1).step_by(2);
    let zeros = odd.clone().filter(|&&b| b == 0).count();
    zeros * 10 >= odd.count() * 9
}
