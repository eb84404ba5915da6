use crate::error::{Error, Result};
use crate::github::GitHubConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub github: GitHubConfig,
    pub contact: ContactConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    /// GitHub account whose repositories are shown
    pub github_owner: String,
    pub repository_page_size: u8,
    /// Repositories highlighted on the about page
    pub featured_repositories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub to_address: Option<String>,
    pub from_address: String,
    /// Per-request timeout for the mail API
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    /// Read content from here instead of the embedded copy
    pub dir: Option<PathBuf>,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    var_or(name, default)
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let featured_repositories = var_or("FEATURED_REPOSITORIES", "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Settings {
            server: ServerConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var("PORT", "3000")?,
                external_url: optional_var("EXTERNAL_URL"),
                api_rate_limit: parse_var("API_RATE_LIMIT", "50")?,
                max_request_body_size: parse_var("MAX_REQUEST_BODY_SIZE", "65536")?,
            },
            site: SiteConfig {
                title: var_or("SITE_TITLE", "Portfolio"),
                github_owner: var_or("GITHUB_OWNER", "octocat"),
                repository_page_size: parse_var("REPOSITORY_PAGE_SIZE", "6")?,
                featured_repositories,
            },
            github: GitHubConfig::from_env()?,
            contact: ContactConfig {
                resend_api_key: optional_var("RESEND_API_KEY"),
                resend_api_url: var_or("RESEND_API_URL", "https://api.resend.com"),
                to_address: optional_var("CONTACT_TO"),
                from_address: var_or("CONTACT_FROM", "Portfolio Contact <onboarding@resend.dev>"),
                timeout_secs: parse_var("CONTACT_TIMEOUT_SECS", "15")?,
            },
            content: ContentConfig {
                dir: optional_var("CONTENT_DIR").map(PathBuf::from),
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if !(1..=100).contains(&self.site.repository_page_size) {
            return Err(Error::Config(
                "Repository page size must be between 1 and 100".to_string(),
            ));
        }

        if self.site.github_owner.trim().is_empty() {
            return Err(Error::Config("GitHub owner must not be empty".to_string()));
        }

        if self.github.timeout_secs == 0 {
            return Err(Error::Config("GitHub timeout must be non-zero".to_string()));
        }

        if self.contact.timeout_secs == 0 {
            return Err(Error::Config("Contact timeout must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Settings suitable for tests: local address, embedded content, no mail
    pub fn for_tests(github_api_url: &str) -> Self {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                external_url: None,
                api_rate_limit: 100,
                max_request_body_size: 65536,
            },
            site: SiteConfig {
                title: "Portfolio".to_string(),
                github_owner: "octocat".to_string(),
                repository_page_size: 6,
                featured_repositories: vec![],
            },
            github: GitHubConfig::default().with_base_url(github_api_url),
            contact: ContactConfig {
                resend_api_key: None,
                resend_api_url: "https://api.resend.com".to_string(),
                to_address: None,
                from_address: "Portfolio Contact <onboarding@resend.dev>".to_string(),
                timeout_secs: 15,
            },
            content: ContentConfig::default(),
        }
    }
}
