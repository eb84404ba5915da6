use crate::github::{
    config::GitHubConfig,
    rate_limiter::{RateLimitStatus, RateLimiter},
};
use crate::{Error, Result};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const USER_AGENT: &str = concat!("portfolio/", env!("CARGO_PKG_VERSION"));
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// GitHub REST API transport. Every call returns a `Result`; turning
/// failures into display fallbacks is the gateway's job.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
    base_url: Url,
    rate_limiter: RateLimiter,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        // Add authentication if token is provided
        if let Some(token) = &config.token {
            let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::Config(format!("Invalid GitHub token: {e}")))?;
            auth_value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "GitHub API URL cannot be used as a base: {}",
                config.api_base_url
            )));
        }

        let rate_limiter = RateLimiter::new(config.rate_limit_buffer);

        Ok(Self {
            client,
            config,
            base_url,
            rate_limiter,
        })
    }

    /// Build an API URL from path segments, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("GitHub API URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, tracking the rate limit and mapping error statuses
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        if self.rate_limiter.is_exhausted().await {
            return Err(Error::RateLimited);
        }

        let response = request.send().await?;

        self.rate_limiter
            .update_from_headers(response.headers())
            .await;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        if status == StatusCode::NOT_FOUND {
            debug!("GitHub API 404 for {}", url);
        } else {
            error!("GitHub API error: {} for {}", status, url);
        }

        Err(match status {
            StatusCode::NOT_FOUND => Error::NotFound(format!("GitHub resource {url}")),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            StatusCode::UNAUTHORIZED => Error::Internal("GitHub authentication failed".to_string()),
            _ => Error::Internal(format!("GitHub API error: {status}")),
        })
    }

    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GitHub API request: GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json::<T>().await?)
    }

    /// `GET /repos/{owner}/{repo}` as an untyped payload
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["repos", owner, repo])?;
        self.get_json(url).await
    }

    /// `GET /users/{owner}/repos`, most recently updated first
    pub async fn list_user_repositories(
        &self,
        owner: &str,
        per_page: u8,
    ) -> Result<Vec<serde_json::Value>> {
        let mut url = self.endpoint(&["users", owner, "repos"])?;
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", &per_page.to_string());
        self.get_json(url).await
    }

    /// Raw README text for a repository
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<String> {
        let url = self.endpoint(&["repos", owner, repo, "readme"])?;
        debug!("GitHub API request: GET {} (raw)", url);

        let request = self.client.get(url).header(header::ACCEPT, RAW_MEDIA_TYPE);
        let response = self.send(request).await?;

        let max = self.config.max_readme_bytes;
        if let Some(content_length) = response.content_length() {
            if content_length > max {
                return Err(Error::Validation(format!(
                    "README too large: {content_length} bytes (max: {max})"
                )));
            }
        }

        let text = response.text().await?;
        if text.len() as u64 > max {
            return Err(Error::Validation(format!(
                "README too large: {} bytes (max: {max})",
                text.len()
            )));
        }
        Ok(text)
    }

    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status().await
    }
}
