//! Provider configuration
//!
//! Constructed once at startup and passed by reference into the client;
//! business logic never reads the environment ad hoc.

const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";
const DEFAULT_MODEL: &str = "doubao-vision";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the external inference provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Authorization credential; absent means analysis cannot run
    pub api_key: Option<String>,
    /// Base endpoint of the provider API
    pub base_url: String,
    /// Model identifier to invoke
    pub model: String,
    /// Client-side timeout for the provider call
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Create configuration with defaults and no credential
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment
    ///
    /// The only place the environment is consulted; call it once in main.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("ARK_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("ARK_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(model) = std::env::var("ARK_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        config
    }

    /// With credential
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With base endpoint
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// With model identifier
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With client-side timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_credential() {
        let config = ProviderConfig::new();
        assert!(config.api_key.is_none());
        assert!(!config.base_url.is_empty());
        assert!(!config.model.is_empty());
    }

    #[test]
    fn builder_overrides() {
        let config = ProviderConfig::new()
            .with_api_key("k")
            .with_base_url("http://localhost:9")
            .with_model("test-model")
            .with_timeout_secs(5);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url, "http://localhost:9");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout_secs, 5);
    }
}
