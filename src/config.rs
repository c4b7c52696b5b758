use std::time::Duration;

use reqwest::Url;

use crate::core::{DashboardError, Result};

/// Behaviour of a table view model
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Quiescence window before the search term is applied
    pub debounce: Duration,

    /// Trimmed search terms shorter than this leave the collection unfiltered
    pub min_search_len: usize,

    /// Rows per page
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_search_len: 3,
            page_size: 10,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Set the minimum search length
    pub fn min_search_len(mut self, len: usize) -> Self {
        self.min_search_len = len;
        self
    }

    /// Set rows per page. Zero is bumped to one.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }
}

/// REST backend connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://localhost:3000`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("nexstock/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: &str) -> Self {
        self.user_agent = agent.to_string();
        self
    }

    /// Parsed base URL, always ending in `/` so resource paths join under it.
    pub fn base(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|e| DashboardError::Config(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DashboardError::Config(format!(
                "unsupported URL scheme '{}'",
                other
            ))),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
