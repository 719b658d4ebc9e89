pub mod admin;
pub mod article;
pub mod cv;
pub mod job_history;
pub mod project;

pub use admin::Admin;
pub use article::{Article, ArticleInput, ArticleSummary};
pub use cv::{CvFile, CvInfo, NewCvFile};
pub use job_history::{JobHistory, JobHistoryInput, ValidJobHistory};
pub use project::{Project, ProjectInput};

use crate::error::Validator;

/// Treats blank optional strings as absent.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Accepts absolute http(s) URLs only.
pub(crate) fn check_url(validator: &mut Validator, field: &str, value: Option<&str>) {
    let Some(raw) = value else { return };
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => validator.add(field, format!("The {} field must be an absolute http(s) URL.", field)),
    }
}

/// Dates arrive either as RFC 3339 timestamps or as plain `YYYY-MM-DD` from
/// date inputs; plain dates are taken as midnight UTC.
pub(crate) mod flexible_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(raw.trim())
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date `{}`", raw))),
        }
    }
}
