//! Server process configuration
//!
//! Read from the environment once at startup; nothing below the HTTP
//! surface touches the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_STAGING_DIR: &str = "./temp";

/// Process-level settings for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind on (env `PORT`)
    pub port: u16,
    /// Directory for staged uploads (env `STAGING_DIR`)
    pub staging_dir: PathBuf,
}

impl ServerConfig {
    /// Create configuration with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(dir) = std::env::var("STAGING_DIR") {
            if !dir.is_empty() {
                config.staging_dir = PathBuf::from(dir);
            }
        }
        config
    }

    /// With port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// With staging directory
    #[inline]
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Socket address to bind
    #[inline]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
        }
    }
}
