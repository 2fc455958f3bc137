//! Prometheus counters for certificate issuance.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    pub static ref CERTIFICATES_ISSUED: IntCounterVec = register_int_counter_vec!(
        "certificates_issued_total",
        "Certificates successfully recorded, by document type",
        &["type"]
    )
    .expect("register certificates_issued_total");
    pub static ref CERTIFICATE_ISSUE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "certificate_issue_failures_total",
        "Rejected or failed issuance attempts, by reason",
        &["reason"]
    )
    .expect("register certificate_issue_failures_total");
}

pub fn record_issued(kind: &str) {
    CERTIFICATES_ISSUED.with_label_values(&[kind]).inc();
}

pub fn record_failure(reason: &str) {
    CERTIFICATE_ISSUE_FAILURES.with_label_values(&[reason]).inc();
}

/// Text exposition of the default registry.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        log::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_exposed() {
        record_issued("residency");
        record_failure("validation");
        let text = gather_text();
        assert!(text.contains("certificates_issued_total"));
        assert!(text.contains("certificate_issue_failures_total"));
    }
}
