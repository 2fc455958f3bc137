//! In-process record store used by tests and the demo mode.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::parse_issued_date;
use crate::certificate::recorder::{
    CertificatePayload, CertificateStore, StoreError, StoredCertificate,
};

#[derive(Debug, Default)]
pub struct InMemoryCertificateStore {
    rows: Mutex<Vec<(CertificatePayload, StoredCertificate)>>,
    insert_calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following insert fail until switched off.
    pub fn fail_next_inserts(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of insert attempts, failed ones included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Payloads of successful inserts, oldest first.
    pub fn payloads(&self) -> Vec<CertificatePayload> {
        self.rows.lock().iter().map(|(p, _)| p.clone()).collect()
    }
}

#[async_trait]
impl CertificateStore for InMemoryCertificateStore {
    async fn insert_certificate(&self, payload: &CertificatePayload) -> Result<i64, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail".to_string()));
        }

        let issued_date = parse_issued_date(&payload.issued_date)?;
        let mut rows = self.rows.lock();
        let id = rows.len() as i64 + 1;
        rows.push((
            payload.clone(),
            StoredCertificate {
                id,
                resident_name: payload.resident_name.clone(),
                type_: payload.type_.clone(),
                issued_date,
                age: payload.age.and_then(|a| i32::try_from(a).ok()),
                civil_status: payload.civil_status.clone(),
                ownership_text: payload.ownership_text.clone(),
                purpose: payload.purpose.clone(),
                amount: payload.amount.clone(),
            },
        ));
        Ok(id)
    }

    async fn list_certificates(&self, limit: i64) -> Result<Vec<StoredCertificate>, StoreError> {
        let rows = self.rows.lock();
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .rev()
            .take(limit)
            .map(|(_, stored)| stored.clone())
            .collect())
    }
}
