//! Authenticated DynECT REST session.
//!
//! The DynECT API is session-based: `POST Session/` with customer, user,
//! and password yields a token that every subsequent call carries in an
//! `Auth-Token` header. Responses share one envelope shape
//! (`status` / `data` / `job_id` / `msgs`); [`DynectSession`] unwraps it
//! and hands the `data` payload to callers through [`RestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::error::{DynectError, Result};
use crate::http_client::HttpUtils;
use crate::transport::RestTransport;
use crate::utils::log_sanitizer::mask_token;

/// Production REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.dynect.net/REST";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response envelope shared by every DynECT endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    #[allow(dead_code)]
    pub job_id: Option<u64>,
    #[serde(default)]
    pub msgs: Vec<ApiMessage>,
}

/// One entry of the envelope's `msgs` block.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(rename = "LVL", default)]
    pub lvl: String,
    #[serde(rename = "INFO", default)]
    pub info: String,
    #[serde(rename = "ERR_CD", default)]
    pub err_cd: Option<String>,
    #[serde(rename = "SOURCE", default)]
    #[allow(dead_code)]
    pub source: Option<String>,
}

impl ApiEnvelope {
    /// Map a non-`success` envelope to an error, preferring the first
    /// `ERROR`-level message.
    fn failure_error(&self) -> DynectError {
        let error_msg = self.msgs.iter().find(|m| m.lvl.eq_ignore_ascii_case("ERROR"));
        match error_msg {
            Some(msg) => DynectError::Api {
                code: msg.err_cd.clone(),
                message: msg.info.clone(),
            },
            None => DynectError::Api {
                code: None,
                message: format!("API returned status '{}'", self.status),
            },
        }
    }
}

/// Authenticated session against the DynECT REST API.
///
/// Shareable across tasks behind an `Arc`; the token lives in an async
/// `RwLock`, so concurrent calls only contend on the lock briefly. Create,
/// [`login`](Self::login), then hand the session to
/// [`RecordClient`](crate::RecordClient).
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use dynect_client::{DynectSession, RecordClient};
/// # async fn example() -> dynect_client::Result<()> {
/// let session = Arc::new(DynectSession::new("customer", "user", "password"));
/// session.login().await?;
/// let client = RecordClient::new(session.clone());
/// # Ok(())
/// # }
/// ```
pub struct DynectSession {
    client: Client,
    api_base: String,
    customer_name: String,
    user_name: String,
    password: String,
    token: RwLock<Option<String>>,
    max_retries: u32,
}

impl DynectSession {
    /// Create an unauthenticated session against the production endpoint.
    pub fn new(
        customer_name: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client: create_http_client(),
            api_base: DEFAULT_API_BASE.to_string(),
            customer_name: customer_name.into(),
            user_name: user_name.into(),
            password: password.into(),
            token: RwLock::new(None),
            max_retries: 0,
        }
    }

    /// Point the session at a different API base (trailing slash stripped).
    /// Intended for test servers and API-compatible gateways.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Retry transient transport failures up to `max_retries` times with
    /// exponential backoff. Defaults to 0 (single attempt), which keeps
    /// record-ID polling's "transport failure aborts immediately" behavior.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Open a session: `POST Session/` and store the returned token.
    pub async fn login(&self) -> Result<()> {
        #[derive(Deserialize)]
        struct SessionData {
            token: String,
        }

        let body = json!({
            "customer_name": self.customer_name,
            "user_name": self.user_name,
            "password": self.password,
        });
        let data = self.raw_call(Method::POST, "Session/", Some(body), None).await?;
        let session: SessionData =
            serde_json::from_value(data).map_err(|e| DynectError::ParseError {
                detail: format!("session response missing token: {e}"),
            })?;

        log::info!("DynECT session established (token {})", mask_token(&session.token));
        *self.token.write().await = Some(session.token);
        Ok(())
    }

    /// Close the session: `DELETE Session/` and drop the stored token.
    pub async fn logout(&self) -> Result<()> {
        let token = self.current_token().await?;
        self.raw_call(Method::DELETE, "Session/", None, Some(&token)).await?;
        *self.token.write().await = None;
        log::info!("DynECT session closed");
        Ok(())
    }

    async fn current_token(&self) -> Result<String> {
        self.token
            .read()
            .await
            .clone()
            .ok_or(DynectError::SessionRequired)
    }

    /// Build, send, and unwrap one envelope-carrying request.
    async fn raw_call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = format!("{}/{}", self.api_base, path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            request = request.header("Auth-Token", token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let (_status, response_text) =
            HttpUtils::execute_request_with_retry(request, method.as_str(), path, self.max_retries)
                .await?;

        let envelope: ApiEnvelope = HttpUtils::parse_json(&response_text)?;
        if !envelope.status.eq_ignore_ascii_case("success") {
            let err = envelope.failure_error();
            if err.is_expected() {
                log::warn!("{method} {path}: {err}");
            } else {
                log::error!("{method} {path}: {err}");
            }
            return Err(err);
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl RestTransport for DynectSession {
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let token = self.current_token().await?;
        self.raw_call(method, path, body, Some(&token)).await
    }
}

/// HTTP client with connect/request timeouts applied.
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_carries_data() {
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{"status": "success", "data": {"token": "abc"}, "job_id": 1, "msgs": []}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.data["token"], "abc");
    }

    #[test]
    fn envelope_data_defaults_to_null() {
        let envelope: ApiEnvelope = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(envelope.data.is_null());
        assert!(envelope.msgs.is_empty());
    }

    #[test]
    fn envelope_failure_uses_error_message() {
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{
                "status": "failure",
                "data": {},
                "msgs": [
                    {"LVL": "INFO", "INFO": "ignored", "ERR_CD": null, "SOURCE": "API-B"},
                    {"LVL": "ERROR", "INFO": "No such zone", "ERR_CD": "NOT_FOUND", "SOURCE": "BLL"}
                ]
            }"#,
        )
        .unwrap();
        let err = envelope.failure_error();
        assert!(matches!(
            err,
            DynectError::Api { code: Some(code), message }
                if code == "NOT_FOUND" && message == "No such zone"
        ));
    }

    #[test]
    fn envelope_failure_without_msgs_reports_status() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"status": "incomplete", "msgs": []}"#).unwrap();
        let err = envelope.failure_error();
        assert!(matches!(
            err,
            DynectError::Api { code: None, message } if message.contains("incomplete")
        ));
    }

    #[test]
    fn api_base_trailing_slash_stripped() {
        let session = DynectSession::new("c", "u", "p").with_api_base("http://localhost:8080/REST/");
        assert_eq!(session.api_base, "http://localhost:8080/REST");
    }

    #[tokio::test]
    async fn execute_without_login_is_rejected() {
        let session = DynectSession::new("c", "u", "p");
        let err = session
            .execute(Method::GET, "Zone/example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DynectError::SessionRequired));
    }
}
