use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads::sanitize_filename;

/// GET /uploads/{filename} - serve a previously stored image from the
/// uploads directory. The name is re-sanitized so the route cannot be
/// used to read outside it.
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let safe = sanitize_filename(&filename);
    if safe.is_empty() {
        return Err(AppError::NotFound);
    }

    let path = state.config.uploads_path().join(&safe);
    let bytes = tokio::fs::read(&path).await.map_err(|_| AppError::NotFound)?;

    let mime = mime_guess::from_path(&safe).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        bytes,
    )
        .into_response())
}
