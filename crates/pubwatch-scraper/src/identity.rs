//! Stable post identifiers derived from canonical URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const POST_ID_LEN: usize = 32;

/// Derive a stable post id from a normalized URL.
///
/// Base64-encodes the URL bytes, keeps only alphanumeric characters, and
/// takes the trailing 32. Same-profile URLs share a long scheme+host+profile
/// prefix and differ only in the path tail, so the id must come from the end
/// of the encoding, not the front. Deterministic across runs and processes.
/// Truncation can theoretically collide; the store's URL uniqueness
/// constraint is the backstop, which is why dedup checks `post_id OR url`.
#[must_use]
pub fn derive_post_id(normalized_url: &str) -> String {
    let encoded: String = STANDARD
        .encode(normalized_url.as_bytes())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let start = encoded.len().saturating_sub(POST_ID_LEN);
    encoded[start..].to_string()
}
