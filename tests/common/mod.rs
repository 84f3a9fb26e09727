//! Shared helpers for the live API tests.

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use dynect_client::DynectSession;

/// Skip the test when any of the listed environment variables is unset.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Build a session from `DYNECT_CUSTOMER_NAME` / `DYNECT_USER_NAME` /
/// `DYNECT_PASSWORD`.
pub fn session_from_env() -> Option<Arc<DynectSession>> {
    let customer_name = env::var("DYNECT_CUSTOMER_NAME").ok()?;
    let user_name = env::var("DYNECT_USER_NAME").ok()?;
    let password = env::var("DYNECT_PASSWORD").ok()?;
    Some(Arc::new(DynectSession::new(
        customer_name,
        user_name,
        password,
    )))
}

/// The zone live tests are allowed to write into (`TEST_ZONE`).
pub fn test_zone() -> Option<String> {
    env::var("TEST_ZONE").ok()
}

/// Generate a unique record name so concurrent test runs cannot collide.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}
