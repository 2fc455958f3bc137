//! Certificate issuance engine.
//!
//! This module contains the pieces every document type shares:
//! - `registry` / `templates` - the closed set of document types
//! - `computation` / `selector` / `form` - entity selection and derived fields
//! - `render` - letterhead, body and footer composition, Typst/PDF output
//! - `recorder` - validation and the append-only issuance log
//! - `session` - one editing session wiring the above together

pub mod clock;
pub mod computation;
pub mod form;
pub mod key;
pub mod recorder;
pub mod registry;
pub mod render;
pub mod selector;
pub mod session;
pub mod templates;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use computation::{compute_age, DerivedFields};
pub use form::{CertificateForm, FormError, FormState, SessionPhase};
pub use key::DocumentTypeKey;
pub use recorder::{
    CertificatePayload, CertificateRecord, CertificateStore, IssuanceRecorder, StoreError,
};
pub use registry::{RegistryError, Template, TemplateRegistry};
pub use render::{DocumentRenderer, RenderError, RenderOptions};
pub use selector::{EntitySelector, Selection, SelectionError, SlotId};
pub use session::{EditingSession, SessionOptions};
pub use validation::{ValidationError, ValidationErrors};

use thiserror::Error;

use crate::directory::DirectoryError;

/// Errors surfaced by the certificate engine. All are local and recoverable.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    NotFound(#[from] RegistryError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("failed to save certificate: {0}")]
    Persistence(#[source] StoreError),
    #[error("failed to render certificate: {0}")]
    Render(#[from] RenderError),
    #[error("failed to load directory: {0}")]
    Directory(#[from] DirectoryError),
}

impl From<ValidationErrors> for CertificateError {
    fn from(errors: ValidationErrors) -> Self {
        CertificateError::Validation(errors)
    }
}

impl From<SelectionError> for CertificateError {
    fn from(error: SelectionError) -> Self {
        CertificateError::Form(FormError::Selection(error))
    }
}
