use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::normalize_optional;
use crate::error::{ApiError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public listing projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            slug: article.slug.clone(),
            excerpt: article.excerpt.clone(),
            created_at: article.created_at,
        }
    }
}

/// Create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl ArticleInput {
    /// Validates and trims the payload.
    pub fn into_valid(self) -> Result<Self, ApiError> {
        let input = Self {
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            content: self.content,
            excerpt: normalize_optional(self.excerpt),
            published: self.published,
        };

        let mut v = Validator::new();
        v.require("title", &input.title);
        v.max_len("title", &input.title, 200);
        v.require("slug", &input.slug);
        v.max_len("slug", &input.slug, 200);
        if !input.slug.is_empty() && !is_slug(&input.slug) {
            v.add("slug", "The slug field may only contain lowercase letters, digits and single hyphens.");
        }
        v.require("content", &input.content);
        if let Some(excerpt) = &input.excerpt {
            v.max_len("excerpt", excerpt, 500);
        }
        v.finish()?;

        Ok(input)
    }
}
