//! Request and response bodies for the certificate endpoints.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::certificate::registry::FieldKind;
use crate::certificate::render::Artifact;
use crate::certificate::{
    CertificateRecord, DocumentTypeKey, EditingSession, Selection, SessionPhase, SlotId, Template,
};

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SlotSummary {
    pub id: SlotId,
    pub label: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct FieldSummary {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// A registered document type and its form schema.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct TemplateSummary {
    pub key: DocumentTypeKey,
    pub title: String,
    pub record_name: String,
    pub slots: Vec<SlotSummary>,
    pub fields: Vec<FieldSummary>,
}

impl From<&Template> for TemplateSummary {
    fn from(template: &Template) -> Self {
        Self {
            key: template.key,
            title: template.title.to_string(),
            record_name: template.key.record_name().to_string(),
            slots: template
                .slots
                .iter()
                .map(|s| SlotSummary {
                    id: s.id,
                    label: s.label.to_string(),
                })
                .collect(),
            fields: template
                .fields
                .iter()
                .map(|f| FieldSummary {
                    name: f.name.to_string(),
                    label: f.label.to_string(),
                    kind: f.kind,
                    required: f.required,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct OpenSessionRequest {
    /// Document type identifier, e.g. `"residency"`.
    #[schema(example = "residency")]
    pub key: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SlotView {
    pub id: SlotId,
    pub label: String,
    pub query: String,
    pub selection: Option<Selection>,
}

/// Everything the office UI needs to redraw a session.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub key: DocumentTypeKey,
    pub phase: SessionPhase,
    pub slots: Vec<SlotView>,
    pub values: BTreeMap<String, String>,
    pub amount: String,
    pub last_record: Option<CertificateRecord>,
}

impl From<&EditingSession> for SessionView {
    fn from(session: &EditingSession) -> Self {
        let template = session.template();
        let form = session.form();
        let state = form.state();
        let slots = template
            .slots
            .iter()
            .map(|slot| SlotView {
                id: slot.id,
                label: slot.label.to_string(),
                query: form
                    .selector()
                    .query(slot.id)
                    .map(str::to_string)
                    .unwrap_or_default(),
                selection: state.selection(slot.id).cloned(),
            })
            .collect();

        Self {
            id: session.id(),
            key: template.key,
            phase: session.phase(),
            slots,
            values: state.values,
            amount: state.amount,
            last_record: session.last_record().cloned(),
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CandidateQuery {
    pub slot: SlotId,
    /// Case-insensitive substring of the display name.
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SelectEntityRequest {
    pub entity_id: i64,
}

/// Partial update: only the named fields (and the amount, if present) change.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateFieldsRequest {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// Typst source and its assets (base64) for the live preview.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PreviewResponse {
    pub source: String,
    pub assets: BTreeMap<String, String>,
}

impl From<Artifact> for PreviewResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            source: artifact.source,
            assets: artifact
                .assets
                .iter()
                .map(|(name, bytes)| (name.clone(), STANDARD.encode(bytes)))
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of records, 1 to 500. Defaults to 50.
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 500)
    }
}
