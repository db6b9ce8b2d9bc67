//! HTTP surface for the image-batch analysis pipeline
//!
//! Wires the staging area, batch policy, inference client, and result
//! normalizer behind two endpoints:
//! - `POST /upload`: multipart image batch in, staging handles out
//! - `POST /analyze`: staged handles in, guaranteed report out
//!
//! All shared state lives in [`AppContext`]; each request runs
//! independently on top of it.

pub mod config;
pub mod handlers;
pub mod routes;

pub use config::ServerConfig;
pub use routes::routes;

use rapport_inference::ImageAnalyzer;
use rapport_staging::StagingArea;
use std::sync::Arc;

/// Shared per-process state handed to every request
#[derive(Clone)]
pub struct AppContext {
    /// Staging area for uploaded image bytes
    pub staging: StagingArea,
    /// The external analysis capability (or a test double)
    pub analyzer: Arc<dyn ImageAnalyzer>,
}

impl AppContext {
    /// Create a context over a staging area and an analyzer
    #[inline]
    #[must_use]
    pub fn new(staging: StagingArea, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self { staging, analyzer }
    }
}
