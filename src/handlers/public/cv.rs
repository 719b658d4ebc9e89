// handlers/public/cv.rs - current CV metadata and download

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::database::models::CvInfo;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/cv - metadata of the current CV
pub async fn info(State(state): State<AppState>) -> Result<Json<CvInfo>, ApiError> {
    state
        .store
        .current_cv_info()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No CV has been uploaded."))
}

/// GET /api/cv/download - the current CV as an attachment
pub async fn download(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cv = state
        .store
        .current_cv()
        .await?
        .ok_or_else(|| ApiError::not_found("No CV has been uploaded."))?;

    let content_type =
        HeaderValue::from_str(&cv.content_type).unwrap_or(HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&attachment_disposition(&cv.file_name))
        .unwrap_or(HeaderValue::from_static("attachment"));

    Ok((
        [(header::CONTENT_TYPE, content_type), (header::CONTENT_DISPOSITION, disposition)],
        cv.data,
    )
        .into_response())
}

/// Quoted-string filename with characters that would break the header dropped.
pub(crate) fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    if safe.trim().is_empty() {
        "attachment; filename=\"cv.pdf\"".to_string()
    } else {
        format!("attachment; filename=\"{}\"", safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_strips_header_breaking_characters() {
        assert_eq!(attachment_disposition("Jane CV.pdf"), "attachment; filename=\"Jane CV.pdf\"");
        assert_eq!(attachment_disposition("a\"b\r\n.pdf"), "attachment; filename=\"ab.pdf\"");
        assert_eq!(attachment_disposition("\"\""), "attachment; filename=\"cv.pdf\"");
    }
}
