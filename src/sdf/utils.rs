//! Low-level text utilities

use encoding_rs::{Encoding, UTF_8};
use log::warn;

/// Resolve an encoding label (e.g. `"utf-8"`, `"latin1"`, `"gbk"`).
///
/// Unknown labels fall back to UTF-8. Encodings that are not ASCII compatible
/// (UTF-16 and friends) also fall back, since records are split on raw `\n` bytes.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding.is_ascii_compatible() => encoding,
        Some(encoding) => {
            warn!("Encoding '{}' is not line-splittable, using UTF-8", encoding.name());
            UTF_8
        }
        None => {
            warn!("Unknown encoding label '{}', using UTF-8", label);
            UTF_8
        }
    }
}

/// Split a raw line into its content and its terminator (`\n`, `\r\n` or nothing).
pub fn split_line_ending(raw: &[u8]) -> (&[u8], &[u8]) {
    let content_len = match raw {
        [.., b'\r', b'\n'] => raw.len() - 2,
        [.., b'\n'] => raw.len() - 1,
        _ => raw.len(),
    };
    raw.split_at(content_len)
}
