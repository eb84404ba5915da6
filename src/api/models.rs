use serde::{Deserialize, Serialize};

use crate::contact::Draft;
use crate::content::Record;
use crate::github::{RateLimitStatus, RepositoryMetadata};
use crate::query::{Query, SortKey};

/// Query-string parameters shared by list pages and list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl ListParams {
    pub fn to_query(&self, default_sort: SortKey) -> Query {
        Query::from_params(
            self.q.as_deref(),
            self.category.as_deref(),
            self.sort.as_deref(),
            default_sort,
        )
    }
}

/// Filtered records
#[derive(Debug, Clone, Serialize)]
pub struct RecordListResponse {
    pub results: Vec<Record>,
    pub total: usize,
    pub query: QueryEcho,
}

/// The query as it was understood
#[derive(Debug, Clone, Serialize)]
pub struct QueryEcho {
    pub q: String,
    pub category: String,
    pub sort: SortKey,
}

impl From<&Query> for QueryEcho {
    fn from(query: &Query) -> Self {
        Self {
            q: query.search_term.clone(),
            category: query.category.as_param().to_string(),
            sort: query.sort,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryListResponse {
    pub owner: String,
    pub results: Vec<RepositoryMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryParams {
    #[serde(default)]
    pub readme: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryDetail {
    pub repository: RepositoryMetadata,
    pub readme: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftResponse {
    pub draft: Option<Draft>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub sent: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub articles: usize,
    pub projects: usize,
    pub github: RateLimitStatus,
    pub mail: String,
}
