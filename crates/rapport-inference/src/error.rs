//! Error types for the inference pipeline
//!
//! Two-arm split by policy, not by mechanism:
//! - [`ProviderFault`]: anything the external provider did wrong —
//!   absorbed by the normalizer, never surfaced to the end caller
//! - [`AnalysisError::MissingCredential`]: configuration fault —
//!   surfaced directly, before any network call

/// Faults from the external provider, absorbed into the fallback report
#[derive(Debug, thiserror::Error)]
pub enum ProviderFault {
    /// Network-level failure, including client-side timeout
    #[error("provider transport failure: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("provider returned status {0}")]
    Status(u16),

    /// Provider answered 2xx but the body could not be mapped to a report
    #[error("provider response could not be mapped to a report")]
    UnusableResponse,
}

/// Errors from requesting an analysis
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No provider credential configured; fails before any network call
    #[error("provider credential not configured (set ARK_API_KEY)")]
    MissingCredential,

    /// Provider fault; the caller is expected to normalize this away
    #[error(transparent)]
    Provider(#[from] ProviderFault),
}
