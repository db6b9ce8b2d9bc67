//! Temporary image staging for the analysis pipeline
//!
//! Provides the two leaf components of the upload-validate-analyze flow:
//! - [`StagingArea`]: durably stages uploaded image bytes under
//!   collision-resistant handles and deletes them after use
//! - [`BatchPolicy`]: structural preconditions on an upload batch
//!   (minimum count, media-type whitelist, per-file size ceiling)
//!
//! Staged files live in a shared ephemeral directory. Each file's
//! lifecycle is independent; filename uniqueness is the only
//! concurrency-safety mechanism needed.

pub mod error;
pub mod policy;
pub mod store;

pub use error::{BatchError, StagingError};
pub use policy::BatchPolicy;
pub use store::{StagedBatch, StagedImage, StagingArea};
