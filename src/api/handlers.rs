use actix_web::{http::header, web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{
    CandidateQuery, HistoryQuery, OpenSessionRequest, PreviewResponse, SelectEntityRequest,
    SessionView, TemplateSummary, UpdateFieldsRequest,
};
use super::error::ApiError;
use super::AppState;
use crate::certificate::recorder::StoredCertificate;
use crate::certificate::{CertificateError, CertificateRecord, EditingSession, FormError, SlotId};
use crate::directory::{DirectoryContext, EntitySnapshot};
use crate::{metrics, ErrorResponse};

#[utoipa::path(
    get,
    path = "/api/certificates/templates",
    tag = "Certificates",
    responses(
        (status = 200, description = "Registered document types", body = Vec<TemplateSummary>)
    )
)]
pub async fn list_templates(state: web::Data<AppState>) -> HttpResponse {
    let templates: Vec<TemplateSummary> = state
        .registry
        .templates()
        .map(TemplateSummary::from)
        .collect();
    HttpResponse::Ok().json(templates)
}

#[utoipa::path(
    post,
    path = "/api/certificates/sessions",
    tag = "Certificates",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionView),
        (status = 404, description = "Unknown document type", body = ErrorResponse),
        (status = 503, description = "Directory unavailable", body = ErrorResponse)
    )
)]
pub async fn open_session(
    state: web::Data<AppState>,
    request: web::Json<OpenSessionRequest>,
) -> Result<HttpResponse, ApiError> {
    let template = *state
        .registry
        .resolve_name(&request.key)
        .map_err(CertificateError::from)?;

    let context = DirectoryContext::load(state.directory.as_ref())
        .await
        .map_err(|e| {
            log::error!("Failed to load directory for {} session: {}", template.key, e);
            CertificateError::from(e)
        })?;

    let session = EditingSession::open(
        template,
        Arc::new(context),
        state.renderer.clone(),
        state.clock.clone(),
        state.session_options.clone(),
    );
    let view = SessionView::from(&session);
    state.sessions.insert(session).await;

    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    get,
    path = "/api/certificates/sessions/{id}",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let view = SessionView::from(&*session.lock());
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    delete,
    path = "/api/certificates/sessions/{id}",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session closed")
    )
)]
pub async fn close_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    state.sessions.remove(path.into_inner()).await;
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    get,
    path = "/api/certificates/sessions/{id}/candidates",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID"), CandidateQuery),
    responses(
        (status = 200, description = "Matching entities", body = Vec<EntitySnapshot>),
        (status = 400, description = "Slot not declared by this document", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn search_candidates(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<CandidateQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let candidates: Vec<EntitySnapshot> = {
        let mut session = session.lock();
        session.set_query(query.slot, &query.q)?;
        session
            .candidates(query.slot)?
            .into_iter()
            .cloned()
            .collect()
    };
    Ok(HttpResponse::Ok().json(candidates))
}

#[utoipa::path(
    put,
    path = "/api/certificates/sessions/{id}/slots/{slot}",
    tag = "Certificates",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("slot" = SlotId, Path, description = "Selection slot")
    ),
    request_body = SelectEntityRequest,
    responses(
        (status = 200, description = "Entity selected", body = SessionView),
        (status = 404, description = "Session or entity not found", body = ErrorResponse)
    )
)]
pub async fn select_entity(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, SlotId)>,
    request: web::Json<SelectEntityRequest>,
) -> Result<HttpResponse, ApiError> {
    let (id, slot) = path.into_inner();
    let session = state.sessions.get(id).await?;
    let view = {
        let mut session = session.lock();
        session.select(slot, request.entity_id)?;
        SessionView::from(&*session)
    };
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    delete,
    path = "/api/certificates/sessions/{id}/slots/{slot}",
    tag = "Certificates",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("slot" = SlotId, Path, description = "Selection slot")
    ),
    responses(
        (status = 200, description = "Slot cleared", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn clear_slot(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, SlotId)>,
) -> Result<HttpResponse, ApiError> {
    let (id, slot) = path.into_inner();
    let session = state.sessions.get(id).await?;
    let view = {
        let mut session = session.lock();
        session.clear(slot)?;
        SessionView::from(&*session)
    };
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    put,
    path = "/api/certificates/sessions/{id}/fields",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateFieldsRequest,
    responses(
        (status = 200, description = "Fields updated", body = SessionView),
        (status = 400, description = "Unknown field", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn update_fields(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateFieldsRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let request = request.into_inner();
    let view = {
        let mut session = session.lock();
        // Reject the whole update if any name is foreign to the template.
        if let Some(name) = request
            .values
            .keys()
            .find(|name| session.template().field(name).is_none())
        {
            return Err(CertificateError::Form(FormError::UnknownField(name.clone())).into());
        }
        for (name, value) in &request.values {
            session.set_field(name, value)?;
        }
        if let Some(amount) = &request.amount {
            session.set_amount(amount);
        }
        SessionView::from(&*session)
    };
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    get,
    path = "/api/certificates/sessions/{id}/preview",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Typst preview artifact", body = PreviewResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn preview(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let artifact = session.lock().preview();
    Ok(HttpResponse::Ok().json(PreviewResponse::from(artifact)))
}

#[utoipa::path(
    get,
    path = "/api/certificates/sessions/{id}/pdf",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Compiled certificate", content_type = "application/pdf"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Typst compilation failed", body = ErrorResponse)
    )
)]
pub async fn export_pdf(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let (renderer, tree, kind, holder, issued_on) = {
        let session = session.lock();
        (
            session.renderer().clone(),
            session.render_tree(),
            session.template().key,
            session.holder(),
            session.today(),
        )
    };

    let document = web::block(move || renderer.export_pdf(&tree, kind.as_str(), &holder, issued_on))
        .await
        .map_err(|e| ApiError::Blocking(e.to_string()))?
        .map_err(CertificateError::from)?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ))
        .body(document.pdf))
}

#[utoipa::path(
    post,
    path = "/api/certificates/sessions/{id}/issue",
    tag = "Certificates",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 201, description = "Certificate recorded", body = CertificateRecord),
        (status = 400, description = "Form incomplete", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Record store failed", body = ErrorResponse)
    )
)]
pub async fn issue(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.sessions.get(path.into_inner()).await?;
    let pending = session.lock().begin_issue();

    let outcome = state
        .recorder
        .save(&pending.template, &pending.form, pending.issued_at)
        .await;
    session.lock().finish_issue(&pending, &outcome);

    Ok(HttpResponse::Created().json(outcome?))
}

#[utoipa::path(
    get,
    path = "/api/certificates",
    tag = "Certificates",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Issued certificates, most recent first", body = Vec<StoredCertificate>),
        (status = 502, description = "Record store failed", body = ErrorResponse)
    )
)]
pub async fn list_certificates(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = state
        .recorder
        .store()
        .list_certificates(query.limit())
        .await
        .map_err(CertificateError::Persistence)?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/metrics/certificates",
    tag = "Certificates",
    responses(
        (status = 200, description = "Issuance counters in Prometheus text format", content_type = "text/plain")
    )
)]
pub async fn certificate_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::gather_text())
}
