//! Client configuration.

use crate::resolve::ResolverMode;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "HANSARD_API_BASE";

/// Configuration for [`crate::client::HansardClient`].
///
/// # Example
///
/// ```ignore
/// use hansard_stream::config::ClientConfig;
///
/// let config = ClientConfig::from_env().with_base_url("http://10.0.0.5:8000");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// How unparseable `final` payloads are handled
    pub resolver_mode: ResolverMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resolver_mode: ResolverMode::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config, honoring the `HANSARD_API_BASE` override.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        config
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the resolver mode.
    pub fn with_resolver_mode(mut self, mode: ResolverMode) -> Self {
        self.resolver_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.resolver_mode, ResolverMode::Strict);
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let config = ClientConfig::new().with_base_url("http://example.test:8000/");
        assert_eq!(config.base_url, "http://example.test:8000");
    }

    #[test]
    fn test_with_resolver_mode() {
        let config = ClientConfig::new().with_resolver_mode(ResolverMode::Lenient);
        assert_eq!(config.resolver_mode, ResolverMode::Lenient);
    }
}
