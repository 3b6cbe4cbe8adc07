//! Short-lived cached credential for upstream catalog APIs.
//!
//! Token refresh is a separate concern from moderation retries: an expired
//! bearer token is re-fetched through this cache, never by re-entering a
//! request retry loop. Concurrent callers share one refresh.

use std::time::Duration;

use muse_core::Result;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// How long before expiry a token is already considered stale, so a
/// request never departs with a token about to lapse mid-flight.
const REFRESH_SKEW: Duration = Duration::from_secs(30);

struct TokenState {
    token: String,
    expires_at: Instant,
}

/// A cached bearer token with expiry.
#[derive(Default)]
pub struct CachedToken {
    state: Mutex<Option<TokenState>>,
}

impl CachedToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token while valid; otherwise run `fetch` and
    /// cache its result. The internal lock is held across the fetch, so
    /// concurrent callers wait for one refresh instead of each fetching.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<(String, Duration)>>,
    {
        let mut state = self.state.lock().await;

        if let Some(ref current) = *state {
            if Instant::now() + REFRESH_SKEW < current.expires_at {
                return Ok(current.token.clone());
            }
        }

        debug!(component = "credentials", "refreshing bearer token");
        let (token, ttl) = fetch().await?;
        *state = Some(TokenState {
            token: token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token)
    }

    /// Drop the cached token (e.g. after an upstream 401).
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }
}
