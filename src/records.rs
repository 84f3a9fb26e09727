//! Record management on top of the session transport.
//!
//! [`RecordClient`] translates record operations into DynECT REST calls:
//! CRUD against `{type}Record/...` paths, zone publishing, and the
//! eventual-consistency poll that resolves a freshly created record's
//! provider-assigned ID from its FQDN.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DynectError, Result};
use crate::transport::RestTransport;
use crate::types::{RData, Record, RecordDetail, RecordRequest, RecordType};

/// Tuning for the record-ID discovery poll.
///
/// The listing endpoint is eventually consistent after a create, so the
/// poll ramps linearly (`attempt * backoff_factor`, capped at `max_delay`)
/// until a wall-clock budget (`max_cumulative_wait`) of sleep time is
/// spent. Explicit configuration exists so tests can compress the budget
/// to milliseconds.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Per-attempt delay multiplier.
    pub backoff_factor: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
    /// Total sleep budget; once reached, the poll gives up.
    pub max_cumulative_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            backoff_factor: Duration::from_millis(250),
            max_delay: Duration::from_millis(2000),
            max_cumulative_wait: Duration::from_millis(30_000),
        }
    }
}

impl PollConfig {
    /// Delay before the next attempt: `min(attempt * backoff_factor,
    /// max_delay)`. Attempts are numbered from 1.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        (self.backoff_factor * attempt).min(self.max_delay)
    }
}

/// Record CRUD, zone publishing, and record-ID discovery.
///
/// Methods take `&mut Record` and enrich it in place: `create_record`
/// derives the FQDN, `find_record_id` fills the ID, `get_record`
/// repopulates every field from the API. The client itself is stateless
/// apart from its transport handle and poll tuning.
pub struct RecordClient {
    transport: Arc<dyn RestTransport>,
    poll: PollConfig,
}

impl RecordClient {
    /// Create a client over an authenticated transport.
    pub fn new(transport: Arc<dyn RestTransport>) -> Self {
        Self {
            transport,
            poll: PollConfig::default(),
        }
    }

    /// Replace the default poll tuning.
    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Publish pending changes for a zone: `PUT Zone/{zone}` with a
    /// publish flag. The response body is not interpreted.
    pub async fn publish_zone(&self, zone: &str) -> Result<()> {
        #[derive(Serialize)]
        struct PublishZone {
            publish: bool,
        }

        let body = to_body(&PublishZone { publish: true })?;
        self.transport
            .execute(Method::PUT, &format!("Zone/{zone}"), Some(body))
            .await?;
        log::info!("published zone {zone}");
        Ok(())
    }

    /// Create a record: `POST {type}Record/{zone}/{fqdn}`.
    ///
    /// Derives the FQDN when empty (empty `name` means the zone apex) and
    /// leaves `record.id` untouched; the API does not return the new ID
    /// synchronously, so callers resolve it separately with
    /// [`find_record_id`](Self::find_record_id).
    pub async fn create_record(&self, record: &mut Record) -> Result<()> {
        fill_fqdn(record);
        let body = record_request_body(record)?;
        let path = format!(
            "{}Record/{}/{}",
            record.record_type, record.zone, record.fqdn
        );
        self.transport.execute(Method::POST, &path, Some(body)).await?;
        Ok(())
    }

    /// Update a record by ID: `PUT {type}Record/{zone}/{fqdn}/{id}` with
    /// the same body shape as create.
    pub async fn update_record(&self, record: &mut Record) -> Result<()> {
        fill_fqdn(record);
        let body = record_request_body(record)?;
        let path = format!(
            "{}Record/{}/{}/{}",
            record.record_type, record.zone, record.fqdn, record.id
        );
        self.transport.execute(Method::PUT, &path, Some(body)).await?;
        Ok(())
    }

    /// Delete a record by ID: `DELETE {type}Record/{zone}/{fqdn}/{id}`.
    ///
    /// Fails with [`MissingRecordId`](DynectError::MissingRecordId) before
    /// any HTTP call when the ID is empty. A DELETE on the bare FQDN path
    /// would remove every record under that name.
    pub async fn delete_record(&self, record: &mut Record) -> Result<()> {
        fill_fqdn(record);
        if record.id.is_empty() {
            return Err(DynectError::MissingRecordId {
                fqdn: record.fqdn.clone(),
            });
        }
        let path = format!(
            "{}Record/{}/{}/{}",
            record.record_type, record.zone, record.fqdn, record.id
        );
        self.transport.execute(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Fetch a record by ID and repopulate every field of `record` from
    /// the response, flattening the typed rdata back into the value
    /// string. An unrecognized record type in the response is an error.
    pub async fn get_record(&self, record: &mut Record) -> Result<()> {
        let path = format!(
            "{}Record/{}/{}/{}",
            record.record_type, record.zone, record.fqdn, record.id
        );
        let data = self.transport.execute(Method::GET, &path, None).await?;
        let detail: RecordDetail =
            serde_json::from_value(data).map_err(|e| DynectError::ParseError {
                detail: format!("record response: {e}"),
            })?;

        let record_type = RecordType::parse(&detail.record_type)?;
        let rdata = RData::from_block(record_type, &detail.rdata)?;

        record.name = detail
            .fqdn
            .strip_suffix(&format!(".{}", detail.zone))
            .unwrap_or(&detail.fqdn)
            .to_string();
        record.zone = detail.zone;
        record.fqdn = detail.fqdn;
        record.record_type = record_type;
        record.ttl = detail.ttl.to_string();
        record.value = rdata.value_string();
        Ok(())
    }

    /// Resolve the record's provider-assigned ID from its FQDN, polling
    /// with the client's default [`PollConfig`].
    pub async fn find_record_id(&self, record: &mut Record) -> Result<()> {
        let poll = self.poll.clone();
        self.find_record_id_with(record, &poll).await
    }

    /// Resolve the record's ID with explicit poll tuning.
    ///
    /// Lists record URLs under `AllRecord/{zone}/{fqdn}` and keeps the URL
    /// whose `/REST/{type}Record/{zone}/{fqdn}/` suffix is a bare ID;
    /// nested child-resource URLs keep a path separator after the prefix
    /// and are skipped. At least one listing request is always made, even
    /// with a zero wait budget. Transport failures abort the poll
    /// immediately; more than one distinct candidate is
    /// [`AmbiguousRecordId`](DynectError::AmbiguousRecordId); an exhausted
    /// budget is [`RecordIdNotFound`](DynectError::RecordIdNotFound).
    ///
    /// The waits are plain `tokio::time::sleep`s, so dropping the returned
    /// future (or racing it with a caller-side deadline) cancels the poll.
    pub async fn find_record_id_with(&self, record: &mut Record, poll: &PollConfig) -> Result<()> {
        let path = format!("AllRecord/{}/{}", record.zone, record.fqdn);
        let prefix = format!(
            "/REST/{}Record/{}/{}/",
            record.record_type, record.zone, record.fqdn
        );

        let mut attempt: u32 = 1;
        let mut waited = Duration::ZERO;
        loop {
            let data = self.transport.execute(Method::GET, &path, None).await?;
            let urls: Vec<String> =
                serde_json::from_value(data).map_err(|e| DynectError::ParseError {
                    detail: format!("record URL listing: {e}"),
                })?;
            log::debug!("{} record URLs listed for {}", urls.len(), record.fqdn);

            if let Some(id) = unique_candidate(&urls, &prefix, &record.fqdn)? {
                log::info!("resolved record ID {} for {}", id, record.fqdn);
                record.id = id;
                return Ok(());
            }

            // Budget check sits after the fetch so at least one listing
            // request is made even when retries are disabled.
            if waited >= poll.max_cumulative_wait {
                break;
            }

            let delay = poll.delay_for(attempt);
            log::debug!(
                "record ID for {} not visible yet, retrying in {:?}",
                record.fqdn,
                delay
            );
            tokio::time::sleep(delay).await;
            waited += delay;
            attempt += 1;
        }

        Err(DynectError::RecordIdNotFound {
            fqdn: record.fqdn.clone(),
            waited_ms: waited.as_millis() as u64,
        })
    }
}

/// Derive the FQDN from name and zone when the caller left it empty. An
/// empty name addresses the zone apex, so the FQDN is the zone itself.
fn fill_fqdn(record: &mut Record) {
    if record.fqdn.is_empty() {
        record.fqdn = if record.name.is_empty() {
            record.zone.clone()
        } else {
            format!("{}.{}", record.name, record.zone)
        };
    }
}

/// Build the `{ rdata, ttl }` request envelope for create/update.
fn record_request_body(record: &Record) -> Result<Value> {
    let rdata = RData::build(record.record_type, &record.value)?;
    to_body(&RecordRequest {
        rdata: rdata.to_block(),
        ttl: record.ttl.clone(),
    })
}

fn to_body<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| DynectError::SerializationError {
        detail: e.to_string(),
    })
}

/// Pick the single record ID out of a URL listing.
///
/// A URL counts only if stripping `prefix` leaves a non-empty remainder
/// with no further path separator; anything else is a nested resource or
/// a record of another type. Distinct survivors beyond the first are an
/// ambiguity error rather than a silent last-wins pick.
fn unique_candidate(urls: &[String], prefix: &str, fqdn: &str) -> Result<Option<String>> {
    let mut candidates: Vec<String> = Vec::new();
    for url in urls {
        let Some(stripped) = url.strip_prefix(prefix) else {
            continue;
        };
        if stripped.is_empty() || stripped.contains('/') {
            continue;
        }
        if !candidates.iter().any(|c| c == stripped) {
            candidates.push(stripped.to_string());
        }
    }
    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => Err(DynectError::AmbiguousRecordId {
            fqdn: fqdn.to_string(),
            candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqdn_derived_from_name_and_zone() {
        let mut record = Record::new("example.com", "www", RecordType::A, "192.0.2.1", "300");
        fill_fqdn(&mut record);
        assert_eq!(record.fqdn, "www.example.com");
    }

    #[test]
    fn fqdn_for_apex_record_is_the_zone() {
        let mut record = Record::new("example.com", "", RecordType::A, "192.0.2.1", "300");
        fill_fqdn(&mut record);
        assert_eq!(record.fqdn, "example.com");
    }

    #[test]
    fn fqdn_already_set_is_kept() {
        let mut record = Record::new("example.com", "www", RecordType::A, "192.0.2.1", "300");
        record.fqdn = "already.example.com".to_string();
        fill_fqdn(&mut record);
        assert_eq!(record.fqdn, "already.example.com");
    }

    #[test]
    fn delay_ramps_linearly_and_caps() {
        let poll = PollConfig::default();
        assert_eq!(poll.delay_for(1), Duration::from_millis(250));
        assert_eq!(poll.delay_for(2), Duration::from_millis(500));
        assert_eq!(poll.delay_for(7), Duration::from_millis(1750));
        assert_eq!(poll.delay_for(8), Duration::from_millis(2000));
        assert_eq!(poll.delay_for(100), Duration::from_millis(2000));
    }

    const PREFIX: &str = "/REST/ARecord/example.com/www.example.com/";

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn candidate_skips_nested_resources() {
        let listing = urls(&[
            "/REST/ARecord/example.com/www.example.com/7001/history",
            "/REST/ARecord/example.com/www.example.com/7001",
        ]);
        let id = unique_candidate(&listing, PREFIX, "www.example.com").unwrap();
        assert_eq!(id.as_deref(), Some("7001"));
    }

    #[test]
    fn candidate_skips_other_record_types() {
        let listing = urls(&["/REST/TXTRecord/example.com/www.example.com/8002"]);
        let id = unique_candidate(&listing, PREFIX, "www.example.com").unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn candidate_skips_empty_remainder() {
        let listing = urls(&["/REST/ARecord/example.com/www.example.com/"]);
        let id = unique_candidate(&listing, PREFIX, "www.example.com").unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn duplicate_candidate_is_not_ambiguous() {
        let listing = urls(&[
            "/REST/ARecord/example.com/www.example.com/7001",
            "/REST/ARecord/example.com/www.example.com/7001",
        ]);
        let id = unique_candidate(&listing, PREFIX, "www.example.com").unwrap();
        assert_eq!(id.as_deref(), Some("7001"));
    }

    #[test]
    fn distinct_candidates_are_ambiguous() {
        let listing = urls(&[
            "/REST/ARecord/example.com/www.example.com/7001",
            "/REST/ARecord/example.com/www.example.com/7002",
        ]);
        let err = unique_candidate(&listing, PREFIX, "www.example.com").unwrap_err();
        assert!(matches!(
            err,
            DynectError::AmbiguousRecordId { candidates, .. } if candidates == vec!["7001", "7002"]
        ));
    }
}
