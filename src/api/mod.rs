//! JSON/HTTP adapter used by the office UI.
//!
//! - `handlers` - actix-web endpoints under `/api/certificates`
//! - `sessions` - idle-evicted editing sessions
//! - `dto` - request and response bodies
//! - `error` - status mapping for engine errors

pub mod dto;
pub mod error;
pub mod handlers;
pub mod sessions;

pub use error::ApiError;
pub use sessions::{SessionStore, SharedSession};

use actix_web::web;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;

use crate::certificate::{
    CertificateStore, Clock, DocumentRenderer, IssuanceRecorder, SessionOptions, TemplateRegistry,
};
use crate::directory::EntityDirectory;

#[derive(Clone)]
pub struct AppState {
    pub registry: TemplateRegistry,
    pub directory: Arc<dyn EntityDirectory>,
    pub recorder: IssuanceRecorder,
    pub renderer: Arc<DocumentRenderer>,
    pub clock: Arc<dyn Clock>,
    pub session_options: SessionOptions,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn EntityDirectory>,
        store: Arc<dyn CertificateStore>,
        renderer: DocumentRenderer,
        clock: Arc<dyn Clock>,
        session_options: SessionOptions,
        session_ttl: Duration,
    ) -> Self {
        Self {
            registry: TemplateRegistry::builtin(),
            directory,
            recorder: IssuanceRecorder::new(store),
            renderer: Arc::new(renderer),
            clock,
            session_options,
            sessions: SessionStore::new(session_ttl),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_templates,
        handlers::open_session,
        handlers::get_session,
        handlers::close_session,
        handlers::search_candidates,
        handlers::select_entity,
        handlers::clear_slot,
        handlers::update_fields,
        handlers::preview,
        handlers::export_pdf,
        handlers::issue,
        handlers::list_certificates,
        handlers::certificate_metrics
    ),
    components(
        schemas(
            dto::TemplateSummary,
            dto::SlotSummary,
            dto::FieldSummary,
            dto::OpenSessionRequest,
            dto::SessionView,
            dto::SlotView,
            dto::SelectEntityRequest,
            dto::UpdateFieldsRequest,
            dto::PreviewResponse,
            crate::certificate::CertificateRecord,
            crate::certificate::recorder::RecordedFields,
            crate::certificate::recorder::StoredCertificate,
            crate::certificate::Selection,
            crate::certificate::DerivedFields,
            crate::certificate::DocumentTypeKey,
            crate::certificate::SlotId,
            crate::certificate::SessionPhase,
            crate::certificate::ValidationError,
            crate::certificate::registry::FieldKind,
            crate::directory::EntitySnapshot,
            crate::directory::EntityKind,
            crate::ErrorResponse,
        )
    ),
    tags(
        (name = "Certificates", description = "Certificate sessions, preview, export and issuance.")
    )
)]
pub struct ApiDoc;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/certificates")
            .route(web::get().to(handlers::list_certificates)),
    )
    .service(
        web::resource("/certificates/templates")
            .route(web::get().to(handlers::list_templates)),
    )
    .service(
        web::resource("/certificates/sessions")
            .route(web::post().to(handlers::open_session)),
    )
    .service(
        web::resource("/certificates/sessions/{id}")
            .route(web::get().to(handlers::get_session))
            .route(web::delete().to(handlers::close_session)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/candidates")
            .route(web::get().to(handlers::search_candidates)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/slots/{slot}")
            .route(web::put().to(handlers::select_entity))
            .route(web::delete().to(handlers::clear_slot)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/fields")
            .route(web::put().to(handlers::update_fields)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/preview")
            .route(web::get().to(handlers::preview)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/pdf")
            .route(web::get().to(handlers::export_pdf)),
    )
    .service(
        web::resource("/certificates/sessions/{id}/issue")
            .route(web::post().to(handlers::issue)),
    )
    .service(
        web::resource("/metrics/certificates")
            .route(web::get().to(handlers::certificate_metrics)),
    );
}
