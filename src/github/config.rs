use std::env;

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API access configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Optional bearer token; unauthenticated requests are still attempted without it
    pub token: Option<String>,

    /// Base API URL, overridable for GitHub Enterprise or tests
    pub api_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Stop sending requests once this few remain in the rate-limit window
    pub rate_limit_buffer: u32,

    /// READMEs larger than this are treated as absent
    pub max_readme_bytes: u64,
}

impl GitHubConfig {
    /// Create a new GitHubConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timeout_secs = match env::var("GITHUB_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Config("Invalid GITHUB_TIMEOUT_SECS value".to_string()))?,
            Err(_) => defaults.timeout_secs,
        };

        Ok(Self {
            token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            api_base_url: env::var("GITHUB_API_URL").unwrap_or(defaults.api_base_url),
            timeout_secs,
            rate_limit_buffer: env::var("GITHUB_RATE_LIMIT_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_buffer),
            max_readme_bytes: env::var("GITHUB_MAX_README_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_readme_bytes),
        })
    }

    /// Point the client at another API root, keeping everything else
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            rate_limit_buffer: 5,
            max_readme_bytes: 512 * 1024,
        }
    }
}
