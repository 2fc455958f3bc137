//! One editing session: a template, its form, the shared directory context
//! and the renderer used for both preview and export.
//!
//! Phases move `Empty -> Populated` on primary selection and
//! `Populated -> Committed` only when a save succeeds. Any later edit
//! leaves `Committed`.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::clock::Clock;
use super::form::{CertificateForm, FormState, SessionPhase};
use super::recorder::{CertificateRecord, IssuanceRecorder};
use super::registry::Template;
use super::render::{Artifact, DocumentRenderer, DocumentTree, Footer, GeneratedDocument, Header};
use super::selector::SlotId;
use super::CertificateError;
use crate::directory::{DirectoryContext, EntitySnapshot};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Position of the official who signs every certificate.
    pub signatory_position: String,
    /// Return the form to `Empty` after a successful save.
    pub reset_on_commit: bool,
    /// Offset used to turn instants into calendar dates.
    pub utc_offset: FixedOffset,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            signatory_position: "Punong Barangay".to_string(),
            reset_on_commit: false,
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap_or(Utc.fix()),
        }
    }
}

/// Snapshot taken when a save starts; handed back to `finish_issue`.
#[derive(Debug, Clone)]
pub struct PendingIssue {
    pub template: Template,
    pub form: FormState,
    pub issued_at: DateTime<Utc>,
    revision: u64,
}

pub struct EditingSession {
    id: Uuid,
    form: CertificateForm,
    context: Arc<DirectoryContext>,
    renderer: Arc<DocumentRenderer>,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
    revision: u64,
    committed_revision: Option<u64>,
    last_record: Option<CertificateRecord>,
}

impl EditingSession {
    pub fn open(
        template: Template,
        context: Arc<DirectoryContext>,
        renderer: Arc<DocumentRenderer>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        let form = CertificateForm::new(template, context.residents.clone());
        let id = Uuid::new_v4();
        log::info!("Opened {} session {}", template.key, id);
        Self {
            id,
            form,
            context,
            renderer,
            clock,
            options,
            revision: 0,
            committed_revision: None,
            last_record: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn template(&self) -> &Template {
        self.form.template()
    }

    pub fn form(&self) -> &CertificateForm {
        &self.form
    }

    pub fn last_record(&self) -> Option<&CertificateRecord> {
        self.last_record.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.committed_revision == Some(self.revision) {
            SessionPhase::Committed
        } else if self.form.is_populated() {
            SessionPhase::Populated
        } else {
            SessionPhase::Empty
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.options.utc_offset)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn set_query(&mut self, slot: SlotId, query: &str) -> Result<(), CertificateError> {
        self.form.set_query(slot, query)?;
        Ok(())
    }

    pub fn candidates(&self, slot: SlotId) -> Result<Vec<&EntitySnapshot>, CertificateError> {
        Ok(self.form.candidates(slot)?)
    }

    /// Select an entity; its derived fields are frozen at today's date.
    pub fn select(&mut self, slot: SlotId, entity_id: i64) -> Result<(), CertificateError> {
        let as_of = self.today();
        self.form.select(slot, entity_id, as_of)?;
        self.touch();
        log::debug!("Session {} selected entity {} in {} slot", self.id, entity_id, slot);
        Ok(())
    }

    pub fn clear(&mut self, slot: SlotId) -> Result<(), CertificateError> {
        self.form.clear(slot)?;
        self.touch();
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CertificateError> {
        self.form.set_value(name, value)?;
        self.touch();
        Ok(())
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.form.set_amount(amount);
        self.touch();
    }

    /// Compose the certificate for the current form.
    pub fn render_tree(&self) -> DocumentTree {
        let issued_on = self.today();
        let state = self.form.state();
        let profile = &self.context.profile;

        let header = Header::new(profile.clone(), self.context.logo.clone());
        let body = self.template().render_body(&state, profile, issued_on);
        let footer = Footer {
            signatory: self
                .context
                .official_named_for(&self.options.signatory_position),
            signatory_title: self.options.signatory_position.clone(),
            amount: state.amount.clone(),
            issued_on,
        };

        self.renderer.render(&header, &body, &footer)
    }

    /// Live preview artifact.
    pub fn preview(&self) -> Artifact {
        self.renderer.artifact(&self.render_tree())
    }

    /// Display label of the primary selection, or `""`.
    pub fn holder(&self) -> String {
        self.form
            .selector()
            .selection(SlotId::Primary)
            .map(|s| s.entity.display_label())
            .unwrap_or_default()
    }

    pub fn renderer(&self) -> &Arc<DocumentRenderer> {
        &self.renderer
    }

    /// PDF of exactly what `preview` shows.
    pub fn export_pdf(&self) -> Result<GeneratedDocument, CertificateError> {
        Ok(self.renderer.export_pdf(
            &self.render_tree(),
            self.template().key.as_str(),
            &self.holder(),
            self.today(),
        )?)
    }

    /// Capture what a save would record.
    pub fn begin_issue(&self) -> PendingIssue {
        PendingIssue {
            template: *self.template(),
            form: self.form.state(),
            issued_at: self.clock.now(),
            revision: self.revision,
        }
    }

    /// Apply the outcome of a save started with `begin_issue`.
    ///
    /// Failures leave the form untouched. A success marks the session
    /// committed unless it was edited while the save was in flight.
    pub fn finish_issue(
        &mut self,
        pending: &PendingIssue,
        outcome: &Result<CertificateRecord, CertificateError>,
    ) {
        let Ok(record) = outcome else {
            return;
        };

        self.last_record = Some(record.clone());
        if pending.revision != self.revision {
            log::warn!(
                "Session {} changed while record #{} was being saved",
                self.id,
                record.id
            );
            return;
        }

        if self.options.reset_on_commit {
            self.form.reset();
            self.touch();
        }
        self.committed_revision = Some(self.revision);
    }

    /// Save the current form through `recorder`.
    pub async fn issue(
        &mut self,
        recorder: &IssuanceRecorder,
    ) -> Result<CertificateRecord, CertificateError> {
        let pending = self.begin_issue();
        let outcome = recorder
            .save(&pending.template, &pending.form, pending.issued_at)
            .await;
        self.finish_issue(&pending, &outcome);
        outcome
    }
}
