pub mod client;
pub mod config;
pub mod gateway;
pub mod models;
pub mod overrides;
pub mod rate_limiter;

pub use client::GitHubClient;
pub use config::GitHubConfig;
pub use gateway::RepositoryGateway;
pub use models::{RawRepository, RepositoryMetadata};
pub use overrides::{OverrideEntry, RepositoryOverrides};
pub use rate_limiter::{RateLimitStatus, RateLimiter};
