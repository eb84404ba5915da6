// Static site content: blog articles, showcase projects, profile and the
// repository override table. Embedded at build time, optionally replaced
// by files from a directory on disk.

pub mod models;

pub use models::{Collection, LookingFor, Profile, ProcessStep, Record, Skill, SkillGroup, WorkPreference};

use anyhow::{bail, Context};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::github::RepositoryOverrides;
use crate::{Error, Result};

/// Reserved category word meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

const BLOG_FILE: &str = "blog.yaml";
const PROJECTS_FILE: &str = "projects.yaml";
const PROFILE_FILE: &str = "profile.yaml";
const OVERRIDES_FILE: &str = "repositories.yaml";

const EMBEDDED_BLOG: &str = include_str!("../../content/blog.yaml");
const EMBEDDED_PROJECTS: &str = include_str!("../../content/projects.yaml");
const EMBEDDED_PROFILE: &str = include_str!("../../content/profile.yaml");
const EMBEDDED_OVERRIDES: &str = include_str!("../../content/repositories.yaml");

#[derive(Debug, Clone)]
pub struct SiteContent {
    pub blog: Collection,
    pub projects: Collection,
    pub profile: Profile,
    pub overrides: RepositoryOverrides,
}

impl SiteContent {
    /// Content compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_sources(
            EMBEDDED_BLOG,
            EMBEDDED_PROJECTS,
            EMBEDDED_PROFILE,
            EMBEDDED_OVERRIDES,
        )
    }

    /// Load the same four files from a directory
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| {
                Error::Content(format!("Failed to read {}: {}", path.display(), e))
            })
        };

        Self::from_sources(
            &read(BLOG_FILE)?,
            &read(PROJECTS_FILE)?,
            &read(PROFILE_FILE)?,
            &read(OVERRIDES_FILE)?,
        )
    }

    /// Embedded content unless a directory is given
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn from_sources(blog: &str, projects: &str, profile: &str, overrides: &str) -> Result<Self> {
        let blog = parse_collection("blog", blog).map_err(content_error)?;
        let projects = parse_collection("projects", projects).map_err(content_error)?;
        let profile: Profile = serde_yaml::from_str(profile)
            .context("failed to parse profile")
            .map_err(content_error)?;
        let overrides = RepositoryOverrides::from_yaml(overrides)?;

        debug!(
            "Loaded content: {} articles, {} projects, {} repository overrides",
            blog.len(),
            projects.len(),
            overrides.len()
        );

        Ok(Self {
            blog,
            projects,
            profile,
            overrides,
        })
    }
}

fn content_error(e: anyhow::Error) -> Error {
    Error::Content(format!("{e:#}"))
}

fn date_pattern() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}(-\d{2})?$").expect("date pattern is valid"))
}

fn parse_collection(kind: &str, source: &str) -> anyhow::Result<Collection> {
    let collection: Collection = serde_yaml::from_str(source)
        .with_context(|| format!("failed to parse {kind} collection"))?;
    validate_collection(&collection).with_context(|| format!("invalid {kind} collection"))?;
    Ok(collection)
}

fn validate_collection(collection: &Collection) -> anyhow::Result<()> {
    if collection.categories.iter().any(|c| c == ALL_CATEGORIES) {
        bail!("category list must not contain the reserved word '{ALL_CATEGORIES}'");
    }

    let categories: HashSet<&str> = collection.categories.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    for (index, record) in collection.records.iter().enumerate() {
        let position = index + 1;
        if record.id.trim().is_empty() {
            bail!("record #{position} has an empty id");
        }
        if !seen.insert(record.id.as_str()) {
            bail!("duplicate record id '{}'", record.id);
        }
        if record.title.trim().is_empty() {
            bail!("record '{}' has an empty title", record.id);
        }
        if !categories.contains(record.category.as_str()) {
            bail!(
                "record '{}' uses unknown category '{}'",
                record.id,
                record.category
            );
        }
        if !date_pattern().is_match(&record.date) {
            bail!(
                "record '{}' has date '{}', expected YYYY-MM or YYYY-MM-DD",
                record.id,
                record.date
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
categories: [TypeScript, DevOps]
records:
  - id: "1"
    title: TypeScript basics
    description: Types, generics and utility types.
    category: TypeScript
    tags: [TypeScript]
    date: "2024-03-20"
  - id: "2"
    title: Docker guide
    category: DevOps
    tags: [Docker]
    date: "2024-03-14"
"#;

    #[test]
    fn test_embedded_content_is_valid() {
        let content = SiteContent::embedded().unwrap();
        assert!(!content.blog.is_empty());
        assert!(!content.projects.is_empty());
        assert!(!content.profile.name.is_empty());
        assert!(!content.profile.looking_for.is_empty());
    }

    #[test]
    fn test_profile_without_looking_for_section() {
        let profile: Profile = serde_yaml::from_str("name: Ada\nheadline: Engineer\n").unwrap();
        assert!(profile.looking_for.is_empty());
        assert!(profile.looking_for.contract_types.is_empty());
    }

    #[test]
    fn test_parse_collection() {
        let collection = parse_collection("blog", BLOG).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("2").unwrap().title, "Docker guide");
        assert_eq!(collection.get("1").unwrap().popularity, 0);
        assert!(collection.get("3").is_none());
    }

    #[test]
    fn test_rejects_unknown_category() {
        let source = BLOG.replace("category: DevOps", "category: Cloud");
        let err = parse_collection("blog", &source).unwrap_err();
        assert!(format!("{err:#}").contains("unknown category 'Cloud'"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let source = BLOG.replace("id: \"2\"", "id: \"1\"");
        assert!(parse_collection("blog", &source).is_err());
    }

    #[test]
    fn test_rejects_bad_date() {
        let source = BLOG.replace("2024-03-14", "14/03/2024");
        assert!(parse_collection("blog", &source).is_err());
    }

    #[test]
    fn test_rejects_reserved_category() {
        let source = BLOG.replace("[TypeScript, DevOps]", "[All, TypeScript, DevOps]");
        assert!(parse_collection("blog", &source).is_err());
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BLOG_FILE), BLOG).unwrap();
        std::fs::write(dir.path().join(PROJECTS_FILE), EMBEDDED_PROJECTS).unwrap();
        std::fs::write(dir.path().join(PROFILE_FILE), EMBEDDED_PROFILE).unwrap();
        std::fs::write(dir.path().join(OVERRIDES_FILE), EMBEDDED_OVERRIDES).unwrap();

        let content = SiteContent::from_dir(dir.path()).unwrap();
        assert_eq!(content.blog.len(), 2);
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteContent::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Content(_)));
    }
}
