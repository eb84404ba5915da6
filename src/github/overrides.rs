use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// Human-authored description and image for one repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Local table consulted when mapping API payloads, keyed by repository name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryOverrides {
    entries: HashMap<String, OverrideEntry>,
}

impl RepositoryOverrides {
    pub fn from_yaml(source: &str) -> Result<Self> {
        // A document with no entries at all is not valid YAML mapping input
        let has_entries = source.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        });
        if !has_entries {
            return Ok(Self::default());
        }

        let entries: Option<HashMap<String, OverrideEntry>> = serde_yaml::from_str(source)
            .map_err(|e| Error::Content(format!("Failed to parse repository overrides: {e}")))?;
        Ok(Self {
            entries: entries.unwrap_or_default(),
        })
    }

    /// Lookup is by exact repository name
    pub fn get(&self, name: &str) -> Option<&OverrideEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, OverrideEntry)> for RepositoryOverrides {
    fn from_iter<I: IntoIterator<Item = (String, OverrideEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
