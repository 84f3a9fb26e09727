use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// The authenticated REST call contract the record client is built on.
///
/// One method, mirroring the provider's `method + path + request body ->
/// response body` shape. Implementations resolve `path` (no leading slash,
/// e.g. `"Zone/example.com"`) against the API base, attach authentication,
/// and unwrap the response envelope, returning its `data` field (JSON
/// `null` when the call carries none).
///
/// [`DynectSession`](crate::DynectSession) is the production implementation;
/// tests substitute a scripted mock.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Execute one call against the REST endpoint.
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;
}
