use std::sync::Arc;
use tracing::{debug, warn};

use crate::github::{
    client::GitHubClient,
    models::{RawRepository, RepositoryMetadata},
    overrides::RepositoryOverrides,
    rate_limiter::RateLimitStatus,
};
use crate::Error;

/// Boundary between pages and the GitHub API. Operations never fail: every
/// transport or status error degrades to `None` or an empty list.
///
/// There is no caching and no coalescing of identical in-flight requests;
/// each call goes to the API.
#[derive(Clone)]
pub struct RepositoryGateway {
    client: GitHubClient,
    overrides: Arc<RepositoryOverrides>,
}

impl RepositoryGateway {
    pub fn new(client: GitHubClient, overrides: RepositoryOverrides) -> Self {
        Self {
            client,
            overrides: Arc::new(overrides),
        }
    }

    /// One repository, or `None` when it does not exist or cannot be fetched
    pub async fn fetch_repository(&self, owner: &str, name: &str) -> Option<RepositoryMetadata> {
        match self.client.get_repository(owner, name).await {
            Ok(value) => match serde_json::from_value::<RawRepository>(value) {
                Ok(raw) => Some(RepositoryMetadata::from_raw(raw, &self.overrides)),
                Err(e) => {
                    warn!("Unreadable repository payload for {}/{}: {}", owner, name, e);
                    None
                }
            },
            Err(e) => {
                log_downgrade("repository", owner, name, &e);
                None
            }
        }
    }

    /// Raw README text, or `None` when the repository has none
    pub async fn fetch_readme(&self, owner: &str, name: &str) -> Option<String> {
        match self.client.get_readme(owner, name).await {
            Ok(text) => Some(text),
            Err(e) => {
                log_downgrade("readme", owner, name, &e);
                None
            }
        }
    }

    /// Up to `page_size` repositories in the API's own recency order
    pub async fn fetch_repository_list(
        &self,
        owner: &str,
        page_size: u8,
    ) -> Vec<RepositoryMetadata> {
        let values = match self.client.list_user_repositories(owner, page_size).await {
            Ok(values) => values,
            Err(e) => {
                log_downgrade("repository list", owner, "*", &e);
                return Vec::new();
            }
        };

        let total = values.len();
        let repositories: Vec<RepositoryMetadata> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<RawRepository>(value) {
                Ok(raw) => Some(RepositoryMetadata::from_raw(raw, &self.overrides)),
                Err(e) => {
                    warn!("Skipping unreadable repository #{} for {}: {}", index, owner, e);
                    None
                }
            })
            .collect();

        debug!(
            "Fetched {} repositories for {} ({} skipped)",
            repositories.len(),
            owner,
            total - repositories.len()
        );
        repositories
    }

    /// Look up several repositories concurrently, dropping the ones not found.
    /// Result order follows `names`.
    pub async fn fetch_many(&self, owner: &str, names: &[String]) -> Vec<RepositoryMetadata> {
        let lookups = names.iter().map(|name| self.fetch_repository(owner, name));
        futures::future::join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.client.rate_limit_status().await
    }
}

fn log_downgrade(what: &str, owner: &str, name: &str, error: &Error) {
    match error {
        Error::NotFound(_) => debug!("GitHub {} not found: {}/{}", what, owner, name),
        _ => warn!(
            "GitHub {} unavailable for {}/{}: {}",
            what,
            owner,
            name,
            error.log_safe()
        ),
    }
}
