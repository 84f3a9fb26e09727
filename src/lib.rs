//! # dynect-client
//!
//! A convenience client for the Dyn Managed DNS (DynECT) REST API:
//! session-authenticated transport, record CRUD, zone publishing, and
//! FQDN-to-record-ID resolution.
//!
//! The DynECT API is eventually consistent: creating a record does not
//! return its ID, and the listing endpoint may take a while to show it.
//! [`RecordClient::find_record_id`] wraps the resulting poll (linear
//! capped backoff against a wall-clock budget) so callers get either the
//! ID or a definitive error.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS
//!   implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dynect_client::{DynectSession, Record, RecordClient, RecordType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Open an authenticated session
//!     let session = Arc::new(DynectSession::new("customer", "user", "password"));
//!     session.login().await?;
//!
//!     // 2. Create a record and resolve its ID
//!     let client = RecordClient::new(session.clone());
//!     let mut record = Record::new("example.com", "www", RecordType::A, "192.0.2.1", "300");
//!     client.create_record(&mut record).await?;
//!     client.find_record_id(&mut record).await?;
//!     println!("created record {}", record.id);
//!
//!     // 3. Make the change live
//!     client.publish_zone("example.com").await?;
//!
//!     session.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, DynectError>`](DynectError). Notable
//! variants:
//!
//! - [`DynectError::MissingRecordId`] — delete refused without a resolved
//!   ID (the guard against wildcard-style deletion)
//! - [`DynectError::RecordIdNotFound`] — ID resolution exhausted its wait
//!   budget
//! - [`DynectError::AmbiguousRecordId`] — the FQDN has several records of
//!   the requested type
//! - [`DynectError::NetworkError`] / [`DynectError::Timeout`] /
//!   [`DynectError::RateLimited`] — transient transport failures,
//!   retryable via [`DynectSession::with_max_retries`]
//!
//! ## Testing
//!
//! [`RecordClient`] talks to the API only through the [`RestTransport`]
//! trait, so tests drive it with a scripted mock and a compressed
//! [`PollConfig`] instead of the real endpoint.

mod error;
mod http_client;
mod records;
mod session;
mod transport;
mod types;
mod utils;

// Re-export error types
pub use error::{DynectError, Result};

// Re-export the transport seam and its production implementation
pub use session::{DEFAULT_API_BASE, DynectSession};
pub use transport::RestTransport;

// Re-export record types and the record client
pub use records::{PollConfig, RecordClient};
pub use types::{RData, Record, RecordType};
