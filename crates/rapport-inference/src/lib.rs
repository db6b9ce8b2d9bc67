//! External inference client and result normalization
//!
//! Turns a batch of staged images into a structured compatibility
//! report:
//! - [`client::ProviderClient`]: encodes the images, invokes the external
//!   multimodal provider, maps its response into [`report::AnalysisReport`]
//! - [`normalize::normalize`]: guarantees a structurally complete report
//!   even when the provider is down or returns garbage
//!
//! Provider faults are absorbed into the fallback report by design; only
//! configuration faults ([`error::AnalysisError::MissingCredential`]) are
//! surfaced to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod report;

pub use client::{EncodedImage, ImageAnalyzer, ProviderClient};
pub use config::ProviderConfig;
pub use error::{AnalysisError, ProviderFault};
pub use normalize::{fallback_report, normalize};
pub use report::{Advice, AnalysisReport, Interest};
