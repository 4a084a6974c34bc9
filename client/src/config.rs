//! Client configuration loaded from environment variables
//!
//! | variable | default |
//! |---|---|
//! | `ISI_BACKEND_URL` | `http://localhost:4000` |
//! | `ISI_CONNECT_TIMEOUT_SECS` | `10` |
//! | `ISI_LOOKUP_TIMEOUT_SECS` | `30` |

use std::env;
use std::time::Duration;

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

/// Default TCP connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default time a lookup may stay in flight, in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the verification backend, without a trailing slash
    pub base_url: String,
    /// TCP connect timeout (seconds)
    pub connect_timeout_secs: u64,
    /// How long a lookup may stay in flight before it settles as an error (seconds)
    pub lookup_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default timeouts
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: normalize_base_url(
                env::var("ISI_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            ),
            connect_timeout_secs: env::var("ISI_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            lookup_timeout_secs: env::var("ISI_LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    /// Override the lookup timeout
    #[must_use]
    pub const fn with_lookup_timeout_secs(mut self, secs: u64) -> Self {
        self.lookup_timeout_secs = secs;
        self
    }

    /// Connect timeout as a [`Duration`]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Lookup timeout as a [`Duration`]
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Full URL of an endpoint path such as `verify`
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
