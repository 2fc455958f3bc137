//! Certificate record store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCertificateStore;
pub use postgres::PgCertificateStore;

use chrono::{DateTime, Utc};

use crate::certificate::recorder::StoreError;

/// Parse the payload's ISO-8601 `issued_date`.
pub(crate) fn parse_issued_date(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidPayload(format!("issued_date '{}': {}", value, e)))
}
