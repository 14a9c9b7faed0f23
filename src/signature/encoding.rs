//! RFC 3986 percent-encoding used by every canonicalization step.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except ALPHA / DIGIT / `-` / `.` / `_` / `~` is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `input` with the unreserved character set (`%20` for spaces, never `+`).
pub fn encode(input: &str) -> String {
	utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Decodes percent escapes, leaving malformed sequences and `+` untouched.
pub fn decode(input: &str) -> String {
	percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Decodes then re-encodes `input` so already-escaped values are not escaped twice.
pub fn normalize(input: &str) -> String {
	encode(&decode(input))
}
