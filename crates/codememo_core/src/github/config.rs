//! Hosting API client configuration.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for `GithubClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// REST API root, without trailing slash.
    pub api_base_url: String,
    /// Personal access token; anonymous requests are heavily rate limited.
    pub token: Option<String>,
    /// Overall deadline applied to every request.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("codememo/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GithubConfig {
    /// Sets the API root. Trailing slashes are dropped.
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the access token. Blank values count as no token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{GithubConfig, DEFAULT_API_BASE_URL};

    #[test]
    fn blank_token_is_treated_as_anonymous() {
        let config = GithubConfig::default().with_token(Some("   ".to_string()));
        assert_eq!(config.token, None);

        let config = GithubConfig::default().with_token(Some(" ghp_x ".to_string()));
        assert_eq!(config.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn api_base_url_drops_trailing_slash() {
        let config = GithubConfig::default().with_api_base_url("https://ghe.example/api/v3/");
        assert_eq!(config.api_base_url, "https://ghe.example/api/v3");
        assert_eq!(GithubConfig::default().api_base_url, DEFAULT_API_BASE_URL);
    }
}
