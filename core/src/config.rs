//! Client configuration.

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const API_URL_VAR: &str = "PRISMIC_API_URL";

/// Where the repository's API descriptor lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read `PRISMIC_API_URL`, falling back to a local mock server.
    pub fn from_env() -> Self {
        let api_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&api_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
