//! Opaque browse tokens.
//!
//! A token wraps a textual path (`name=repr` segments) into an opaque,
//! URL-safe string that clients can hand back verbatim to resume browsing:
//! a fixed prefix plus the URL-safe base64 of the path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use drilldown_core::ParseError;

/// The prefix identifying browse tokens.
pub const TOKEN_PREFIX: &str = "drill:";

/// Whether a string looks like a browse token.
#[must_use]
pub fn is_token(text: &str) -> bool {
    text.starts_with(TOKEN_PREFIX)
}

/// Encode a textual path as a token.
#[must_use]
pub fn encode(path: &str) -> String {
    format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(path))
}

/// Decode a token back to its textual path.
pub fn decode(token: &str) -> Result<String, ParseError> {
    let payload = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| ParseError::InvalidToken(format!("missing {TOKEN_PREFIX:?} prefix")))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ParseError::InvalidToken(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ParseError::InvalidToken(e.to_string()))
}
