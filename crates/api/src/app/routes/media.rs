use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Extension, Multipart},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::errors;
use crate::app::services::AppServices;

/// The request body limit is lifted here; `MediaUpload` enforces the
/// configured per-file cap while streaming.
pub fn router() -> Router {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::disable())
}

/// Store the first file field of a multipart body.
pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> axum::response::Response {
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => return errors::bad_request("no file field in upload"),
            Err(e) => return errors::multipart_error_to_response(e),
        };
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let mut upload = match services.media.begin(&file_name).await {
            Ok(u) => u,
            Err(e) => return errors::media_error_to_response(e),
        };

        loop {
            match field.chunk().await {
                Ok(Some(bytes)) => {
                    if let Err(e) = upload.write_chunk(&bytes).await {
                        upload.discard().await;
                        return errors::media_error_to_response(e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    upload.discard().await;
                    return errors::multipart_error_to_response(e);
                }
            }
        }

        return match upload.finish().await {
            Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
            Err(e) => errors::media_error_to_response(e),
        };
    }
}
