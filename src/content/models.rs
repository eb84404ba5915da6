use serde::{Deserialize, Serialize};

/// A displayable content item: a blog article or a showcase project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    /// Excerpt for articles, short description for projects
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `YYYY-MM` or `YYYY-MM-DD`, compared as a string
    pub date: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub client: Option<String>,
}

/// A fixed category set plus the records filed under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub categories: Vec<String>,
    pub records: Vec<Record>,
}

impl Collection {
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub process: Vec<ProcessStep>,
    #[serde(default)]
    pub looking_for: LookingFor,
}

/// What kind of position the owner is looking for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookingFor {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub contract_types: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<WorkPreference>,
}

impl LookingFor {
    pub fn is_empty(&self) -> bool {
        self.role.trim().is_empty() && self.contract_types.is_empty() && self.preferences.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPreference {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub group: String,
    pub items: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Self-assessed level, 0-100
    #[serde(default)]
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStep {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub deliverables: Vec<String>,
}
