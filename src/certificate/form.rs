//! Per-session form state and the shared selection + computation capability
//! every template composes.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::computation::DerivedFields;
use super::key::DocumentTypeKey;
use super::registry::Template;
use super::render::Inline;
use super::selector::{EntitySelector, Selection, SelectionError, SlotId};
use crate::common::{format_issuance_date, format_long_date};
use crate::directory::{EntitySnapshot, OrganizationProfile};

/// Lifecycle of an editing session.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No primary selection yet.
    Empty,
    /// A primary selection exists; the preview shows real values.
    Populated,
    /// The last save succeeded.
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("'{0}' is not a field of this document")]
    UnknownField(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Snapshot of everything the user has chosen or typed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub key: DocumentTypeKey,
    pub selections: BTreeMap<SlotId, Selection>,
    pub values: BTreeMap<String, String>,
    pub amount: String,
}

impl FormState {
    pub fn selection(&self, slot: SlotId) -> Option<&Selection> {
        self.selections.get(&slot)
    }

    pub fn primary(&self) -> Option<&Selection> {
        self.selection(SlotId::Primary)
    }

    /// Entered value of `name`, or `""`.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// Entity selection, derived-field computation and field values for one template.
#[derive(Debug, Clone)]
pub struct CertificateForm {
    template: Template,
    selector: EntitySelector,
    values: BTreeMap<String, String>,
    amount: String,
}

impl CertificateForm {
    pub fn new(template: Template, residents: Arc<[EntitySnapshot]>) -> Self {
        let selector = EntitySelector::new(residents, &template.slot_ids(), template.derive);
        Self {
            template,
            selector,
            values: BTreeMap::new(),
            amount: String::new(),
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn selector(&self) -> &EntitySelector {
        &self.selector
    }

    pub fn set_query(&mut self, slot: SlotId, query: &str) -> Result<(), FormError> {
        Ok(self.selector.set_query(slot, query)?)
    }

    pub fn candidates(&self, slot: SlotId) -> Result<Vec<&EntitySnapshot>, FormError> {
        Ok(self.selector.candidates(slot)?)
    }

    pub fn select(
        &mut self,
        slot: SlotId,
        entity_id: i64,
        as_of: NaiveDate,
    ) -> Result<&Selection, FormError> {
        Ok(self.selector.select(slot, entity_id, as_of)?)
    }

    pub fn clear(&mut self, slot: SlotId) -> Result<(), FormError> {
        Ok(self.selector.clear(slot)?)
    }

    pub fn derived(&self, slot: SlotId) -> &DerivedFields {
        self.selector.derived(slot)
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        if self.template.field(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.trim().to_string();
    }

    pub fn is_populated(&self) -> bool {
        self.selector.is_populated(SlotId::Primary)
    }

    pub fn state(&self) -> FormState {
        FormState {
            key: self.template.key,
            selections: self
                .selector
                .slot_ids()
                .filter_map(|slot| self.selector.selection(slot).map(|s| (slot, s.clone())))
                .collect(),
            values: self.values.clone(),
            amount: self.amount.clone(),
        }
    }

    /// Drop every selection and entered value.
    pub fn reset(&mut self) {
        let slots: Vec<SlotId> = self.selector.slot_ids().collect();
        for slot in slots {
            let _ = self.selector.clear(slot);
        }
        self.values.clear();
        self.amount.clear();
    }
}

/// Read-only view handed to template body renderers.
pub struct BodyContext<'a> {
    pub template: &'a Template,
    pub form: &'a FormState,
    pub profile: &'a OrganizationProfile,
    pub issued_on: NaiveDate,
}

impl<'a> BodyContext<'a> {
    pub fn new(
        template: &'a Template,
        form: &'a FormState,
        profile: &'a OrganizationProfile,
        issued_on: NaiveDate,
    ) -> Self {
        Self {
            template,
            form,
            profile,
            issued_on,
        }
    }

    pub fn derived(&self, slot: SlotId) -> DerivedFields {
        self.form
            .selection(slot)
            .map(|s| s.derived.clone())
            .unwrap_or_default()
    }

    /// Upper-cased full name of the person in `slot`.
    pub fn name(&self, slot: SlotId) -> Inline {
        match self.form.selection(slot) {
            Some(selection) => Inline::value(selection.entity.full_name().to_uppercase()),
            None => Inline::blank(),
        }
    }

    pub fn age(&self, slot: SlotId) -> Inline {
        match self.derived(slot).age {
            Some(age) => Inline::value(age.to_string()),
            None => Inline::blank(),
        }
    }

    pub fn civil_status(&self, slot: SlotId) -> Inline {
        Inline::value(self.derived(slot).civil_status.to_lowercase())
    }

    pub fn residing_since(&self, slot: SlotId) -> Inline {
        Inline::value(self.derived(slot).residency_since_year)
    }

    pub fn section(&self, slot: SlotId) -> Inline {
        Inline::value(self.derived(slot).section)
    }

    /// Entered value of a form field.
    pub fn field(&self, name: &str) -> Inline {
        Inline::value(self.form.value(name))
    }

    /// Date field in long form; unparseable input prints as a blank.
    pub fn date_field(&self, name: &str) -> Inline {
        let raw = self.form.value(name).trim();
        if raw.is_empty() {
            return Inline::blank();
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Inline::value(format_long_date(date)),
            Err(_) => {
                log::warn!(
                    "Field '{}' of {} holds malformed date '{}'",
                    name,
                    self.template.key,
                    raw
                );
                Inline::blank()
            }
        }
    }

    pub fn barangay(&self) -> Inline {
        Inline::value(&self.profile.barangay)
    }

    /// "Barangay X, Municipality, Province" with blanks for missing parts.
    pub fn locality(&self) -> Vec<Inline> {
        vec![
            Inline::text("Barangay "),
            self.barangay(),
            Inline::text(", "),
            Inline::value(&self.profile.municipality),
            Inline::text(", "),
            Inline::value(&self.profile.province),
        ]
    }

    pub fn issued(&self) -> Inline {
        Inline::text(format_issuance_date(self.issued_on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::registry::TemplateRegistry;
    use crate::certificate::render::BLANK;
    use crate::directory::{EntityDirectory, InMemoryDirectory};

    async fn form(key: DocumentTypeKey) -> CertificateForm {
        let residents = InMemoryDirectory::sample().fetch_residents().await.unwrap();
        let template = *TemplateRegistry::builtin().resolve(key).unwrap();
        CertificateForm::new(template, Arc::from(residents))
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_state_reflects_selection_and_values() {
        let mut form = form(DocumentTypeKey::Residency).await;
        assert!(!form.is_populated());

        form.select(SlotId::Primary, 1, as_of()).unwrap();
        form.set_value("purpose", "Employment").unwrap();
        form.set_amount(" 10.00 ");

        let state = form.state();
        assert_eq!(state.primary().unwrap().entity.first_name, "Juan");
        assert_eq!(state.value("purpose"), "Employment");
        assert_eq!(state.amount, "10.00");
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let mut form = form(DocumentTypeKey::Residency).await;
        assert_eq!(
            form.set_value("business_name", "Sari-sari").unwrap_err(),
            FormError::UnknownField("business_name".to_string())
        );
    }

    #[tokio::test]
    async fn test_reset_returns_to_empty() {
        let mut form = form(DocumentTypeKey::Marriage).await;
        form.select(SlotId::Primary, 1, as_of()).unwrap();
        form.select(SlotId::Secondary, 2, as_of()).unwrap();
        form.set_amount("50");
        form.reset();

        let state = form.state();
        assert!(state.selections.is_empty());
        assert!(state.amount.is_empty());
    }

    #[tokio::test]
    async fn test_body_context_blanks() {
        let form = form(DocumentTypeKey::Marriage).await;
        let state = form.state();
        let profile = OrganizationProfile::default();
        let ctx = BodyContext::new(form.template(), &state, &profile, as_of());

        assert_eq!(ctx.name(SlotId::Primary).plain(), BLANK);
        assert_eq!(ctx.age(SlotId::Secondary).plain(), BLANK);
        assert_eq!(ctx.date_field("date_of_marriage").plain(), BLANK);
    }

    #[tokio::test]
    async fn test_malformed_date_prints_blank() {
        let mut form = form(DocumentTypeKey::Marriage).await;
        form.set_value("date_of_marriage", "Feb 14").unwrap();
        let state = form.state();
        let profile = OrganizationProfile::default();
        let ctx = BodyContext::new(form.template(), &state, &profile, as_of());
        assert_eq!(ctx.date_field("date_of_marriage").plain(), BLANK);

        let mut form = form;
        form.set_value("date_of_marriage", "2020-02-14").unwrap();
        let state = form.state();
        let ctx = BodyContext::new(form.template(), &state, &profile, as_of());
        assert_eq!(ctx.date_field("date_of_marriage").plain(), "February 14, 2020");
    }
}
