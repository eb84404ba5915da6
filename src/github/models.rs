use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::overrides::RepositoryOverrides;

/// Repository payload as returned by the API. Every field is optional so a
/// partial or unexpected payload still maps to something displayable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRepository {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Display-ready repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub description: String,
    pub star_count: u64,
    pub fork_count: u64,
    pub primary_language: Option<String>,
    pub topics: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub owner_avatar_url: String,
    pub html_url: String,
    /// Local image from the override table
    pub image: Option<String>,
}

impl RepositoryMetadata {
    /// Map a raw payload, with the override table taking precedence for
    /// description and image
    pub fn from_raw(raw: RawRepository, overrides: &RepositoryOverrides) -> Self {
        let name = raw.name.unwrap_or_default();
        let entry = overrides.get(&name);

        let description = entry
            .and_then(|e| e.description.clone())
            .or(raw.description)
            .unwrap_or_default();

        let last_updated = raw
            .updated_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            image: entry.and_then(|e| e.image.clone()),
            description,
            star_count: raw.stargazers_count.unwrap_or(0),
            fork_count: raw.forks_count.unwrap_or(0),
            primary_language: raw.language.filter(|l| !l.is_empty()),
            topics: raw.topics.unwrap_or_default(),
            last_updated,
            owner_avatar_url: raw
                .owner
                .and_then(|o| o.avatar_url)
                .unwrap_or_default(),
            html_url: raw.html_url.unwrap_or_default(),
            name,
        }
    }

    pub fn updated_display(&self) -> String {
        self.last_updated
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
