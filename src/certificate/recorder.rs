//! Issuance recording: validates the form, builds the flat store payload
//! and appends one record per successful call.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::form::FormState;
use super::key::DocumentTypeKey;
use super::registry::{FieldKind, RecordField, Template};
use super::selector::SlotId;
use super::validation::{
    validate_amount_optional, validate_required, ValidationError, ValidationErrors,
};
use super::CertificateError;
use crate::metrics;

/// Flat row handed to the record store.
///
/// Optional columns are omitted when the template does not carry them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CertificatePayload {
    pub resident_name: String,
    pub type_: String,
    /// ISO-8601 instant of the save call.
    pub issued_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub civil_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub amount: String,
}

/// Derived and entered values frozen into a record.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct RecordedFields {
    pub age: Option<u32>,
    pub civil_status: Option<String>,
    pub ownership_text: Option<String>,
    pub purpose: Option<String>,
}

/// A persisted issuance.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CertificateRecord {
    pub id: i64,
    pub resident_name: String,
    #[serde(rename = "type")]
    pub key: DocumentTypeKey,
    pub issued_date: DateTime<Utc>,
    pub amount: String,
    pub derived_fields: RecordedFields,
}

/// A history row as read back from the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema, sqlx::FromRow)]
pub struct StoredCertificate {
    pub id: i64,
    pub resident_name: String,
    pub type_: String,
    pub issued_date: DateTime<Utc>,
    pub age: Option<i32>,
    pub civil_status: Option<String>,
    pub ownership_text: Option<String>,
    pub purpose: Option<String>,
    pub amount: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record store rejected the payload: {0}")]
    InvalidPayload(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only certificate log.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Append a record and return its id.
    async fn insert_certificate(&self, payload: &CertificatePayload) -> Result<i64, StoreError>;

    /// Most recent records first.
    async fn list_certificates(&self, limit: i64) -> Result<Vec<StoredCertificate>, StoreError>;
}

#[derive(Clone)]
pub struct IssuanceRecorder {
    store: Arc<dyn CertificateStore>,
}

impl IssuanceRecorder {
    pub fn new(store: Arc<dyn CertificateStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CertificateStore> {
        &self.store
    }

    /// Validate `form` and build the payload without touching the store.
    pub fn prepare(
        &self,
        template: &Template,
        form: &FormState,
        issued_at: DateTime<Utc>,
    ) -> Result<(CertificatePayload, RecordedFields), ValidationErrors> {
        let Some(primary) = form.primary() else {
            return Err(ValidationError::no_entity_selected().into());
        };

        let mut errors = ValidationErrors::new();
        for slot in template.slots.iter().filter(|s| s.id != SlotId::Primary) {
            if form.selection(slot.id).is_none() {
                errors.add(ValidationError::empty_slot(&slot.id.to_string(), slot.label));
            }
        }
        for field in template.fields {
            let value = form.value(field.name);
            if field.required {
                validate_required(value, field.name, field.label, &mut errors);
            }
            if field.kind == FieldKind::Date
                && !value.trim().is_empty()
                && chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err()
            {
                errors.add(
                    ValidationError::new(
                        field.name,
                        format!("{} '{}' is not a valid date", field.label, value.trim()),
                    )
                    .with_suggestion("Use the format YYYY-MM-DD, e.g. 2024-02-14"),
                );
            }
        }
        validate_amount_optional(&form.amount, "amount", &mut errors);
        errors.into_result()?;

        let mut recorded = RecordedFields::default();
        for field in template.records {
            match field {
                RecordField::Age => recorded.age = primary.derived.age,
                RecordField::CivilStatus => {
                    recorded.civil_status = Some(primary.derived.civil_status.clone())
                }
                RecordField::OwnershipText(source) => {
                    recorded.ownership_text = Some(form.value(source).trim().to_string())
                }
                RecordField::Purpose(source) => {
                    recorded.purpose = Some(form.value(source).trim().to_string())
                }
            }
        }

        let resident_name = form
            .selections
            .values()
            .map(|s| s.entity.display_label())
            .collect::<Vec<_>>()
            .join(" & ");

        let payload = CertificatePayload {
            resident_name,
            type_: template.key.record_name().to_string(),
            issued_date: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            age: recorded.age,
            civil_status: recorded.civil_status.clone(),
            ownership_text: recorded.ownership_text.clone(),
            purpose: recorded.purpose.clone(),
            amount: form.amount.clone(),
        };

        Ok((payload, recorded))
    }

    /// Validate, then append one record. No retry and no de-duplication.
    pub async fn save(
        &self,
        template: &Template,
        form: &FormState,
        issued_at: DateTime<Utc>,
    ) -> Result<CertificateRecord, CertificateError> {
        let (payload, recorded) = match self.prepare(template, form, issued_at) {
            Ok(prepared) => prepared,
            Err(errors) => {
                metrics::record_failure("validation");
                return Err(CertificateError::Validation(errors));
            }
        };

        let id = match self.store.insert_certificate(&payload).await {
            Ok(id) => id,
            Err(e) => {
                log::error!(
                    "Failed to record {} for {}: {}",
                    payload.type_,
                    payload.resident_name,
                    e
                );
                metrics::record_failure("persistence");
                return Err(CertificateError::Persistence(e));
            }
        };

        metrics::record_issued(template.key.as_str());
        log::info!(
            "Recorded {} #{} for {}",
            payload.type_,
            id,
            payload.resident_name
        );

        Ok(CertificateRecord {
            id,
            resident_name: payload.resident_name,
            key: template.key,
            issued_date: issued_at,
            amount: payload.amount,
            derived_fields: recorded,
        })
    }
}
