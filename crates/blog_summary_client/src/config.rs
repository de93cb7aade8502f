//! crates/blog_summary_client/src/config.rs
//!
//! Where the client finds its two remote collaborators.

use std::time::Duration;

const DEFAULT_AUTH_URL: &str = "http://localhost:5000";
const DEFAULT_SUMMARY_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the auth backend (`/api/auth/*`).
    pub auth_base_url: String,
    /// Base URL of the summary service (`/scrape-and-summarize`).
    pub summary_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
            summary_base_url: DEFAULT_SUMMARY_URL.to_string(),
            // Scraping several sites is slow; the summary service gets a generous budget.
            timeout: Duration::from_secs(120),
        }
    }
}

impl ClientConfig {
    /// Reads `BLOG_SUMMARY_AUTH_URL` and `BLOG_SUMMARY_API_URL`, keeping defaults for unset ones.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_base_url: std::env::var("BLOG_SUMMARY_AUTH_URL").unwrap_or(defaults.auth_base_url),
            summary_base_url: std::env::var("BLOG_SUMMARY_API_URL")
                .unwrap_or(defaults.summary_base_url),
            timeout: defaults.timeout,
        }
    }

    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into();
        self
    }

    pub fn with_summary_base_url(mut self, url: impl Into<String>) -> Self {
        self.summary_base_url = url.into();
        self
    }
}

/// Joins a base URL and an absolute path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
