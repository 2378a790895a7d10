//! Remote service configuration.

use std::time::Duration;

/// Where a remote service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL without trailing slash, e.g. `http://katalogus:8000`.
    pub base_url: String,
    /// Per-request timeout (default: 30 seconds).
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
