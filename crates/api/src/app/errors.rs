use axum::http::StatusCode;
use axum::response::IntoResponse;

use axum::extract::multipart::MultipartError;

use catalog_core::{ErrorKind, RpcError, status};
use catalog_infra::MediaError;
use catalog_products::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    if err.kind() == ErrorKind::Internal {
        tracing::error!(error = %err, "catalog store failure");
    }
    rpc_error_to_response(err.to_rpc())
}

pub fn media_error_to_response(err: MediaError) -> axum::response::Response {
    match err {
        MediaError::TooLarge { .. } => {
            rpc_error_to_response(RpcError::new(err.to_string(), status::PAYLOAD_TOO_LARGE))
        }
        MediaError::Io(_) => {
            tracing::error!(error = %err, "media upload failed");
            rpc_error_to_response(RpcError::new(
                "internal server error",
                ErrorKind::Internal.status(),
            ))
        }
    }
}

/// Malformed bodies are 400; axum reports over-limit bodies as 413.
pub fn multipart_error_to_response(err: MultipartError) -> axum::response::Response {
    rpc_error_to_response(RpcError::new(err.body_text(), err.status().as_u16()))
}

pub fn bad_request(message: impl Into<String>) -> axum::response::Response {
    rpc_error_to_response(RpcError::bad_request(message))
}

pub fn rpc_error_to_response(err: RpcError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(err)).into_response()
}
