//! Session manager configuration

use std::time::Duration;

/// Timing knobs for the session manager
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// API root, e.g. `http://localhost:5001`
    pub base_url: String,
    /// How long before `exp` the proactive refresh fires
    pub leeway: Duration,
    /// Attempts closer together than this reuse the previous outcome
    pub min_refresh_interval: Duration,
    /// Lower bound for the expiry timer
    pub min_timer_delay: Duration,
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            leeway: Duration::from_secs(5),
            min_refresh_interval: Duration::from_secs(2),
            min_timer_delay: Duration::from_secs(1),
        }
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn with_min_timer_delay(mut self, delay: Duration) -> Self {
        self.min_timer_delay = delay;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
