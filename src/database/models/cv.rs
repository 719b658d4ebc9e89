use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CvFile {
    pub id: i32,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// CV metadata without the blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CvInfo {
    pub id: i32,
    pub file_name: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&CvFile> for CvInfo {
    fn from(file: &CvFile) -> Self {
        Self {
            id: file.id,
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            uploaded_at: file.uploaded_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCvFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
