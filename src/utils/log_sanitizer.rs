//! Log sanitization helpers.
//!
//! Response bodies can carry TXT payloads (DKIM keys, site-verification
//! tokens) and session responses carry the auth token itself; neither
//! belongs in a debug log verbatim.

/// Maximum number of bytes of a payload to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a payload for logging.
///
/// Short strings pass through unchanged; longer ones are cut at the last
/// char boundary at or below [`TRUNCATE_LIMIT`] and annotated with the
/// original size.
pub fn truncate_for_log(payload: &str) -> String {
    if payload.len() <= TRUNCATE_LIMIT {
        return payload.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !payload.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}... [truncated, {} bytes total]",
        &payload[..end],
        payload.len()
    )
}

/// Mask a session token for logging, keeping a short recognizable prefix.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() == token.len() {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payload_unchanged() {
        assert_eq!(truncate_for_log("hello"), "hello");
    }

    #[test]
    fn payload_at_limit_unchanged() {
        let s = "x".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn long_payload_truncated_with_size() {
        let s = "x".repeat(400);
        let out = truncate_for_log(&s);
        assert!(out.starts_with(&"x".repeat(TRUNCATE_LIMIT)));
        assert!(out.ends_with("[truncated, 400 bytes total]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "ü".repeat(200);
        let out = truncate_for_log(&s);
        assert!(out.contains("[truncated,"));
    }

    #[test]
    fn token_masked_to_prefix() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcdef***");
    }

    #[test]
    fn short_token_fully_masked() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token("abcdef"), "***");
    }
}
