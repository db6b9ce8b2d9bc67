//! Batch validation policy
//!
//! Structural preconditions applied before any expensive work:
//! - minimum batch size, enforced both at upload and at analyze time
//! - maximum batch size, enforced at the transport boundary
//! - per-file size ceiling and media-type whitelist

use crate::error::{BatchError, StagingError};

const DEFAULT_MIN_FILES: usize = 5;
const DEFAULT_MAX_FILES: usize = 20;
const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Structural preconditions on an upload batch
#[derive(Debug, Clone, Copy)]
pub struct BatchPolicy {
    /// Minimum number of valid images per batch
    pub min_files: usize,
    /// Maximum number of files accepted at the transport boundary
    pub max_files: usize,
    /// Per-file size ceiling in bytes
    pub max_file_bytes: u64,
}

impl BatchPolicy {
    /// Create policy with default limits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With minimum batch size
    #[inline]
    #[must_use]
    pub fn with_min_files(mut self, min: usize) -> Self {
        self.min_files = min;
        self
    }

    /// With maximum batch size
    #[inline]
    #[must_use]
    pub fn with_max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// With per-file size ceiling
    #[inline]
    #[must_use]
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Check a batch count against the configured minimum
    ///
    /// Applied twice: after per-file filtering at upload time, and again
    /// against the handle list submitted for analysis (defends against a
    /// caller invoking analysis with a stale or partial handle list).
    #[inline]
    pub fn check_count(&self, actual: usize) -> Result<(), BatchError> {
        if actual < self.min_files {
            return Err(BatchError::BatchTooSmall {
                actual,
                minimum: self.min_files,
            });
        }
        Ok(())
    }

    /// Check a single file's declared media type and size
    ///
    /// Failures here reject that file only, not the whole batch.
    pub fn check_file(&self, media_type: &str, size: u64) -> Result<(), StagingError> {
        if !media_type.starts_with("image/") {
            return Err(StagingError::InvalidMediaType(media_type.to_string()));
        }
        if size > self.max_file_bytes {
            return Err(StagingError::FileTooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(())
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            min_files: DEFAULT_MIN_FILES,
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}
