use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_url, normalize_optional};
use crate::error::{ApiError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub tech_stack: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl ProjectInput {
    pub fn into_valid(self) -> Result<Self, ApiError> {
        let input = Self {
            title: self.title.trim().to_string(),
            description: self.description,
            tech_stack: normalize_optional(self.tech_stack),
            live_url: normalize_optional(self.live_url),
            github_url: normalize_optional(self.github_url),
            image_url: normalize_optional(self.image_url),
            order: self.order,
        };

        let mut v = Validator::new();
        v.require("title", &input.title);
        v.max_len("title", &input.title, 200);
        v.require("description", &input.description);
        check_url(&mut v, "liveUrl", input.live_url.as_deref());
        check_url(&mut v, "githubUrl", input.github_url.as_deref());
        check_url(&mut v, "imageUrl", input.image_url.as_deref());
        v.finish()?;

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_project() {
        let input = ProjectInput {
            title: "Portfolio".into(),
            description: "This site".into(),
            github_url: Some("".into()),
            ..Default::default()
        }
        .into_valid()
        .unwrap();
        assert_eq!(input.github_url, None);
        assert_eq!(input.order, 0);
    }

    #[test]
    fn reports_bad_urls_by_wire_name() {
        let err = ProjectInput {
            title: "Portfolio".into(),
            description: "This site".into(),
            live_url: Some("ftp://example.com".into()),
            ..Default::default()
        }
        .into_valid()
        .unwrap_err();

        match err {
            ApiError::BadRequest { field_errors: Some(errors), .. } => assert!(errors.contains_key("liveUrl")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
