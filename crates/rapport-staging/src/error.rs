//! Error types for staging and batch validation
//!
//! Per-file faults ([`StagingError`]) reject a single upload without
//! failing the whole request; batch faults ([`BatchError`]) reject the
//! whole request after staged files have been purged.

/// Faults affecting a single staged file
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// Declared media type is not an image type
    #[error("unsupported media type: {0} (only image/* is accepted)")]
    InvalidMediaType(String),

    /// File exceeds the per-file size ceiling
    #[error("file too large: {size} bytes exceeds ceiling of {limit}")]
    FileTooLarge {
        /// Actual size of the rejected file
        size: u64,
        /// Configured per-file ceiling
        limit: u64,
    },

    /// Referenced handle has no staged file behind it
    #[error("staged file not found: {0}")]
    NotFound(String),

    /// Handle contains path separators or other forbidden characters
    #[error("malformed staging handle: {0}")]
    MalformedHandle(String),

    /// Filesystem fault during write or read
    #[error("staging io failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StagingError {
    /// Check whether this fault rejects only the one file, leaving the
    /// rest of the batch to be judged on its surviving count
    #[inline]
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::InvalidMediaType(_) | Self::FileTooLarge { .. }
        )
    }
}

/// Whole-batch validation faults
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Fewer valid images than the configured minimum
    #[error("batch too small: {actual} valid images, at least {minimum} required")]
    BatchTooSmall {
        /// Valid images actually present
        actual: usize,
        /// Configured minimum
        minimum: usize,
    },
}
