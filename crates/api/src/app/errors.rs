use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_core::{DomainError, ErrorKind};
use storefront_infra::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match err.kind() {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ErrorKind::EmptyResult => (StatusCode::NOT_FOUND, "no_products_found"),
        ErrorKind::InsufficientStock => (StatusCode::BAD_REQUEST, "insufficient_stock"),
        ErrorKind::DuplicateName => (StatusCode::BAD_REQUEST, "duplicate_name"),
        ErrorKind::Duplicate => (StatusCode::BAD_REQUEST, "duplicate"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation_error"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
