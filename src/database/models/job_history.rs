use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{flexible_date, normalize_optional};
use crate::error::{ApiError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobHistory {
    pub id: i32,
    pub company: String,
    pub role: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_current_role: bool,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_current_role: bool,
    #[serde(default)]
    pub order: i32,
}

/// A validated job-history payload with its start date resolved.
#[derive(Debug, Clone)]
pub struct ValidJobHistory {
    pub company: String,
    pub role: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_current_role: bool,
    pub order: i32,
}

impl JobHistoryInput {
    pub fn into_valid(self) -> Result<ValidJobHistory, ApiError> {
        let company = self.company.trim().to_string();
        let role = self.role.trim().to_string();

        let mut v = Validator::new();
        v.require("company", &company);
        v.max_len("company", &company, 200);
        v.require("role", &role);
        v.max_len("role", &role, 200);
        if self.start_date.is_none() {
            v.add("startDate", "The startDate field is required.");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                v.add("endDate", "The endDate field must not be before startDate.");
            }
        }
        v.finish()?;

        Ok(ValidJobHistory {
            company,
            role,
            description: normalize_optional(self.description),
            start_date: self
                .start_date
                .ok_or_else(|| ApiError::bad_request("The startDate field is required."))?,
            end_date: self.end_date,
            is_current_role: self.is_current_role,
            order: self.order,
        })
    }
}
