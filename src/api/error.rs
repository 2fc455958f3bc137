//! HTTP mapping for engine errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;

use crate::certificate::{CertificateError, FormError, SelectionError};
use crate::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Certificate(#[from] CertificateError),
    #[error("session {0} not found or expired")]
    SessionNotFound(Uuid),
    #[error("PDF export task failed: {0}")]
    Blocking(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Certificate(e) => match e {
                CertificateError::Validation(_) => "ValidationError",
                CertificateError::NotFound(_) => "NotFound",
                CertificateError::Form(FormError::Selection(SelectionError::UnknownEntity(_))) => {
                    "NotFound"
                }
                CertificateError::Form(_) => "BadRequest",
                CertificateError::Persistence(_) => "PersistenceError",
                CertificateError::Render(_) => "RenderError",
                CertificateError::Directory(_) => "DirectoryUnavailable",
            },
            ApiError::SessionNotFound(_) => "NotFound",
            ApiError::Blocking(_) => "InternalServerError",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Certificate(e) => match e {
                CertificateError::Validation(_) => StatusCode::BAD_REQUEST,
                CertificateError::NotFound(_) => StatusCode::NOT_FOUND,
                CertificateError::Form(FormError::Selection(SelectionError::UnknownEntity(_))) => {
                    StatusCode::NOT_FOUND
                }
                CertificateError::Form(_) => StatusCode::BAD_REQUEST,
                CertificateError::Persistence(_) => StatusCode::BAD_GATEWAY,
                CertificateError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CertificateError::Directory(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Certificate(CertificateError::Validation(errors)) => {
                ErrorResponse::new(self.kind(), &errors.to_message())
                    .with_details(errors.errors().to_vec())
            }
            _ => ErrorResponse::new(self.kind(), &self.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::recorder::StoreError;
    use crate::certificate::{RegistryError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let validation: ApiError =
            CertificateError::Validation(ValidationError::no_entity_selected().into()).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let missing: ApiError =
            CertificateError::NotFound(RegistryError::NotFound("nope".into())).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let persistence: ApiError =
            CertificateError::Persistence(StoreError::Unavailable("down".into())).into();
        assert_eq!(persistence.status_code(), StatusCode::BAD_GATEWAY);

        let entity: ApiError = CertificateError::from(SelectionError::UnknownEntity(9)).into();
        assert_eq!(entity.status_code(), StatusCode::NOT_FOUND);

        assert_eq!(
            ApiError::SessionNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
