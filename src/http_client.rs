//! HTTP execution helpers shared by the session transport.
//!
//! The session keeps full control over request construction (URL, headers,
//! body); this module owns the common tail of every call: sending, status
//! mapping, response logging, and the optional transient-error retry.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::DynectError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions.
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Send a prepared request and return `(status, body_text)`.
    ///
    /// HTTP-level failures are mapped before the body is handed back:
    /// 401/403 to [`InvalidCredentials`](DynectError::InvalidCredentials),
    /// 429 to [`RateLimited`](DynectError::RateLimited) (with `Retry-After`
    /// when present), 502-504 to [`NetworkError`](DynectError::NetworkError).
    /// Everything else, including API failure envelopes delivered with
    /// other statuses, is left for the caller to interpret.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), DynectError> {
        log::debug!("{method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                DynectError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                DynectError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("{method_name} {path} -> {status_code}");

        // Grab Retry-After before the body consumes the response.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if matches!(status_code, 401 | 403) {
            let body = response.text().await.unwrap_or_default();
            return Err(DynectError::InvalidCredentials {
                raw_message: (!body.is_empty()).then_some(body),
            });
        }

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(DynectError::RateLimited {
                retry_after,
                raw_message: (!body.is_empty()).then_some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("server error (HTTP {status_code})");
            return Err(DynectError::NetworkError {
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response.text().await.map_err(|e| DynectError::NetworkError {
            detail: format!("failed to read response body: {e}"),
        })?;

        log::debug!("response body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str) -> Result<T, DynectError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("raw response: {}", truncate_for_log(response_text));
            DynectError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// [`execute_request`](Self::execute_request), retrying transient
    /// failures up to `max_retries` times with exponential backoff.
    ///
    /// Only network errors, timeouts, and rate limiting are retried; API
    /// failures and credential errors surface immediately. With
    /// `max_retries == 0` the request runs exactly once, which is the
    /// default the record client relies on.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
        max_retries: u32,
    ) -> Result<(u16, String), DynectError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method_name, path).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is consumed by send(); clone per attempt.
            let Some(req) = request_builder.try_clone() else {
                log::warn!("cannot clone request for {method_name} {path}, disabling retry");
                return Self::execute_request(request_builder, method_name, path).await;
            };

            match Self::execute_request(req, method_name, path).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "{} {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        method_name,
                        path,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| DynectError::NetworkError {
            detail: "all retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Whether an error is transient enough to retry at the transport level.
fn is_retryable(error: &DynectError) -> bool {
    matches!(
        error,
        DynectError::NetworkError { .. }
            | DynectError::Timeout { .. }
            | DynectError::RateLimited { .. }
    )
}

/// Delay before the next transport retry.
///
/// A rate-limit `Retry-After` hint wins (capped at 30s); otherwise
/// exponential backoff from 100ms, capped at 10s.
fn retry_delay(error: &DynectError, attempt: u32) -> Duration {
    if let DynectError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        let capped_attempt = attempt.min(20); // keep 1 << attempt in range
        let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
        Duration::from_millis(delay_ms.min(10_000))
    }
}
