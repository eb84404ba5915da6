use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Tracks the GitHub rate-limit window from response headers
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<RwLock<RateLimitState>>,
    buffer: u32,
}

#[derive(Debug, Clone)]
struct RateLimitState {
    limit: u32,
    remaining: u32,
    /// Unix timestamp when the window resets
    reset_at: i64,
}

/// Point-in-time view of the rate-limit window
#[derive(Debug, Clone, serde::Serialize)]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimiter {
    pub fn new(buffer: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(RateLimitState {
                limit: 60, // Default for unauthenticated requests
                remaining: 60,
                reset_at: Utc::now().timestamp() + 3600,
            })),
            buffer,
        }
    }

    /// Update rate limit from GitHub API response headers
    pub async fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let header = |name: &str| -> Option<i64> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
        };

        let mut state = self.state.write().await;

        if let Some(limit) = header("x-ratelimit-limit") {
            state.limit = limit.max(0) as u32;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            state.remaining = remaining.max(0) as u32;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            state.reset_at = reset;
        }

        debug!(
            "Rate limit updated: {}/{} (resets at {})",
            state.remaining, state.limit, state.reset_at
        );
    }

    /// True when the budget is spent for the current window. Page requests
    /// never wait for the reset; callers short-circuit instead.
    pub async fn is_exhausted(&self) -> bool {
        let state = self.state.read().await;
        let now = Utc::now().timestamp();

        if now >= state.reset_at {
            return false;
        }

        // Use the minimum of buffer or 10% of limit to handle low rate limits
        let threshold = self.buffer.min(state.limit / 10);
        let exhausted = state.remaining <= threshold;
        if exhausted {
            warn!(
                "GitHub rate limit exhausted ({}/{}), {} seconds until reset",
                state.remaining,
                state.limit,
                state.reset_at - now
            );
        }
        exhausted
    }

    pub async fn status(&self) -> RateLimitStatus {
        let state = self.state.read().await;
        RateLimitStatus {
            remaining: state.remaining,
            limit: state.limit,
            reset_at: DateTime::from_timestamp(state.reset_at, 0).unwrap_or_else(Utc::now),
        }
    }
}
