use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all DynECT client operations.
///
/// All variants are serializable for structured error reporting, tagged by
/// a `code` field.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on
/// retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// The session transport can retry these with exponential backoff when
/// configured with a non-zero retry count.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum DynectError {
    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, HTTP 5xx from the API frontend, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    #[error("Rate limited{}", .retry_after.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited {
        /// Suggested wait time in seconds before retrying, if the API
        /// provided a `Retry-After` header.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The customer/user/password combination was rejected, or the session
    /// token is no longer accepted.
    #[error("Invalid credentials{}", .raw_message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// An operation that requires an authenticated session was attempted
    /// before `login()` (or after `logout()`).
    #[error("No active session; call login() first")]
    SessionRequired,

    /// The API answered with a failure envelope.
    #[error("API error{}: {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Api {
        /// `ERR_CD` from the response message block, if present.
        #[serde(rename = "error_code")]
        code: Option<String>,
        /// Human-readable message from the response message block.
        message: String,
    },

    /// Failed to parse an API response.
    #[error("Parse error: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Serialization error: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// A record type string outside the supported set (A, AAAA, ALIAS,
    /// CNAME, MX, NS, SOA, TXT, SPF).
    #[error("Unsupported record type: {record_type}")]
    UnsupportedRecordType {
        /// The unsupported record type string.
        record_type: String,
    },

    /// A record value that cannot be encoded for its record type (e.g. an
    /// MX value that is not `"preference exchange"`).
    #[error("Invalid record value '{value}': {detail}")]
    InvalidValue {
        /// The offending value string.
        value: String,
        /// What is wrong with it.
        detail: String,
    },

    /// Refused to delete a record without a resolved ID. Deleting by bare
    /// FQDN would remove every record under that name.
    #[error("Record '{fqdn}' has no ID; refusing to delete without one")]
    MissingRecordId {
        /// FQDN of the record that was passed without an ID.
        fqdn: String,
    },

    /// Record-ID discovery found more than one distinct record of the
    /// requested type under the FQDN.
    #[error("Multiple record IDs found for '{fqdn}': {}", .candidates.join(", "))]
    AmbiguousRecordId {
        /// FQDN that was being resolved.
        fqdn: String,
        /// The distinct IDs the listing returned.
        candidates: Vec<String>,
    },

    /// Record-ID discovery exhausted its wait budget without a match.
    #[error("No record ID found for '{fqdn}' after waiting {waited_ms}ms")]
    RecordIdNotFound {
        /// FQDN that was being resolved.
        fqdn: String,
        /// Total time spent sleeping between listing attempts.
        waited_ms: u64,
    },
}

impl DynectError {
    /// Whether this error is expected behavior (caller mistakes, eventual
    /// consistency) rather than an infrastructure fault, for log levelling.
    ///
    /// `true` should log at `warn`, `false` at `error`.
    /// Keep this in sync when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::SessionRequired
                | Self::UnsupportedRecordType { .. }
                | Self::InvalidValue { .. }
                | Self::MissingRecordId { .. }
                | Self::AmbiguousRecordId { .. }
                | Self::RecordIdNotFound { .. }
        )
    }
}

/// Convenience type alias for `Result<T, DynectError>`.
pub type Result<T> = std::result::Result<T, DynectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = DynectError::NetworkError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "Network error: connection refused");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = DynectError::RateLimited {
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "Rate limited (retry after 30s)");
    }

    #[test]
    fn display_rate_limited_without_retry() {
        let e = DynectError::RateLimited {
            retry_after: None,
            raw_message: None,
        };
        assert_eq!(e.to_string(), "Rate limited");
    }

    #[test]
    fn display_api_error_with_code() {
        let e = DynectError::Api {
            code: Some("TARGET_EXISTS".to_string()),
            message: "name refers to an existing object".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "API error [TARGET_EXISTS]: name refers to an existing object"
        );
    }

    #[test]
    fn display_api_error_without_code() {
        let e = DynectError::Api {
            code: None,
            message: "operation failed".to_string(),
        };
        assert_eq!(e.to_string(), "API error: operation failed");
    }

    #[test]
    fn display_missing_record_id() {
        let e = DynectError::MissingRecordId {
            fqdn: "www.example.com".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Record 'www.example.com' has no ID; refusing to delete without one"
        );
    }

    #[test]
    fn display_ambiguous_record_id() {
        let e = DynectError::AmbiguousRecordId {
            fqdn: "www.example.com".to_string(),
            candidates: vec!["1".to_string(), "2".to_string()],
        };
        assert_eq!(
            e.to_string(),
            "Multiple record IDs found for 'www.example.com': 1, 2"
        );
    }

    #[test]
    fn display_record_id_not_found() {
        let e = DynectError::RecordIdNotFound {
            fqdn: "www.example.com".to_string(),
            waited_ms: 30_000,
        };
        assert_eq!(
            e.to_string(),
            "No record ID found for 'www.example.com' after waiting 30000ms"
        );
    }

    #[test]
    fn serialize_tagged_by_code() {
        let e = DynectError::UnsupportedRecordType {
            record_type: "LOC".to_string(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"UnsupportedRecordType\""));
        assert!(json.contains("\"record_type\":\"LOC\""));
    }

    #[test]
    fn deserialize_json_round_trip() {
        let original = DynectError::RecordIdNotFound {
            fqdn: "www.example.com".to_string(),
            waited_ms: 1250,
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: DynectError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), original.to_string());
    }

    #[test]
    fn expected_errors_are_caller_facing() {
        assert!(
            DynectError::MissingRecordId {
                fqdn: "x".into()
            }
            .is_expected()
        );
        assert!(
            DynectError::UnsupportedRecordType {
                record_type: "LOC".into()
            }
            .is_expected()
        );
        assert!(DynectError::SessionRequired.is_expected());
        assert!(
            !DynectError::NetworkError {
                detail: "x".into()
            }
            .is_expected()
        );
        assert!(
            !DynectError::ParseError {
                detail: "x".into()
            }
            .is_expected()
        );
    }
}
