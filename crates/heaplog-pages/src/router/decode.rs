//! Percent-decoding and -encoding of single path segments.
//!
//! Decoding is strict: a `%` not followed by two hex digits, or a byte
//! sequence that is not UTF-8 once decoded, is rejected instead of being
//! passed through. `+` is kept as-is.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left unescaped when encoding a segment: the unreserved set
/// plus `!*'()`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Decode one percent-encoded path segment.
///
/// Returns `None` when the input is malformed.
pub(crate) fn decode_segment(raw: &str) -> Option<String> {
	if !has_valid_escapes(raw) {
		return None;
	}
	percent_decode_str(raw)
		.decode_utf8()
		.ok()
		.map(|decoded| decoded.into_owned())
}

/// Encode a value so it forms exactly one path segment.
pub(crate) fn encode_segment(value: &str) -> String {
	utf8_percent_encode(value, SEGMENT).to_string()
}

fn has_valid_escapes(raw: &str) -> bool {
	let bytes = raw.as_bytes();
	let mut index = 0;
	while let Some(offset) = bytes[index..].iter().position(|&b| b == b'%') {
		let at = index + offset;
		let escaped = bytes
			.get(at + 1..at + 3)
			.is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
		if !escaped {
			return false;
		}
		index = at + 3;
	}
	true
}
