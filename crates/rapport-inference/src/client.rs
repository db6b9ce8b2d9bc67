//! Inference client for the external multimodal provider
//!
//! Encodes staged image bytes, sends them with a fixed analysis
//! instruction, and maps the provider's answer into an
//! [`AnalysisReport`]. Every transport, status, or mapping failure is
//! converted locally into a [`ProviderFault`]; the raw error never
//! reaches the caller.

use crate::config::ProviderConfig;
use crate::error::{AnalysisError, ProviderFault};
use crate::report::AnalysisReport;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::time::Duration;

/// Task instruction sent with every batch
const ANALYSIS_PROMPT: &str = "Analyze the following social feed screenshots. \
Infer this person's personality traits, interests, lifestyle, and social \
preferences, and produce targeted relationship-building advice: conversation \
topics, date suggestions, communication techniques, and how to pace the \
relationship. The goal is to help the user build a romantic relationship \
with this person.";

/// Persona instruction sent with every batch
const SYSTEM_PROMPT: &str = "You are an expert in courtship with sharp insight \
into how young men and women think and present themselves. You excel at short \
but effective analysis and advice.";

/// One image encoded for transport, paired with its media type
#[derive(Debug, Clone, Serialize)]
pub struct EncodedImage {
    /// Base64-encoded image bytes
    pub data: String,
    /// Declared media type, e.g. `image/jpeg`
    #[serde(rename = "type")]
    pub media_type: String,
}

impl EncodedImage {
    /// Encode raw image bytes for transport
    #[must_use]
    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            media_type: media_type.into(),
        }
    }
}

/// The capability of turning an image batch into a report
///
/// The seam between the pipeline and the external provider; tests swap
/// in local stubs behind it.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Analyze a batch of encoded images
    ///
    /// Provider faults come back as [`AnalysisError::Provider`] for the
    /// normalizer to absorb; [`AnalysisError::MissingCredential`] must be
    /// surfaced instead.
    async fn analyze(&self, images: &[EncodedImage]) -> Result<AnalysisReport, AnalysisError>;
}

#[derive(Debug, Serialize)]
struct PromptInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct ProviderRequest<'a> {
    model: &'a str,
    input: PromptInput<'a>,
    system_prompt: &'a str,
    images: &'a [EncodedImage],
}

/// Client for the external inference provider
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Create a client over the given configuration
    #[inline]
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Get the configuration in force
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ImageAnalyzer for ProviderClient {
    async fn analyze(&self, images: &[EncodedImage]) -> Result<AnalysisReport, AnalysisError> {
        // Credential check comes first; no network call without one.
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::MissingCredential)?;

        let url = format!("{}/responses", self.config.base_url.trim_end_matches('/'));
        let payload = ProviderRequest {
            model: &self.config.model,
            input: PromptInput {
                prompt: ANALYSIS_PROMPT,
            },
            system_prompt: SYSTEM_PROMPT,
            images,
        };

        tracing::info!(
            images = images.len(),
            model = %self.config.model,
            "invoking inference provider"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&payload)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| ProviderFault::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderFault::Status(status.as_u16()).into());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|_| ProviderFault::UnusableResponse)?;

        Ok(map_response(&body)?)
    }
}

/// Map a 2xx provider body into a report
///
/// The contracted envelope is `{"output": <report>}`. Anything else —
/// missing field, wrong shape, or a report with empty fields — is an
/// unusable response, treated identically to an external failure.
pub fn map_response(body: &serde_json::Value) -> Result<AnalysisReport, ProviderFault> {
    let output = body.get("output").ok_or(ProviderFault::UnusableResponse)?;
    let report: AnalysisReport =
        serde_json::from_value(output.clone()).map_err(|_| ProviderFault::UnusableResponse)?;
    if !report.is_complete() {
        return Err(ProviderFault::UnusableResponse);
    }
    Ok(report)
}
