// handlers/protected/cv.rs - CV upload and removal

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::database::models::{CvInfo, NewCvFile};
use crate::error::ApiError;
use crate::middleware::{ApiPath, AuthAdmin};
use crate::state::AppState;

pub const MAX_CV_BYTES: usize = 10 * 1024 * 1024;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// POST /api/cv - replace the stored CV with an uploaded PDF
pub async fn upload(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CvInfo>, ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "cv.pdf".to_string());
        let content_type = field.content_type().map(str::to_string);
        if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            return Err(ApiError::bad_request("Only PDF files are allowed."));
        }

        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::bad_request("No file provided."));
        }
        if data.len() > MAX_CV_BYTES {
            return Err(ApiError::bad_request("File exceeds 10 MB limit."));
        }

        let info = state
            .store
            .replace_cv(NewCvFile {
                file_name,
                content_type: PDF_CONTENT_TYPE.to_string(),
                data: data.to_vec(),
            })
            .await?;
        tracing::info!(id = info.id, file_name = %info.file_name, "CV replaced");
        return Ok(Json(info));
    }

    Err(ApiError::bad_request("No file provided."))
}

/// DELETE /api/cv/:id
pub async fn delete(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_cv(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
