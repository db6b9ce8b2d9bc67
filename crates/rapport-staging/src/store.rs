//! Temporary image store
//!
//! Stages uploaded image bytes on local ephemeral storage under
//! collision-resistant handles and guarantees deletion after use:
//! - [`StagingArea`]: stage / load / release individual files
//! - [`StagedBatch`]: release-guaranteed guard over one request's files
//!
//! A handle is the generated filename itself; callers treat it as opaque.

use crate::error::StagingError;
use crate::policy::BatchPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One staged image, owned by the store until released
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedImage {
    /// Opaque unique handle (the generated filename)
    pub handle: String,
    /// Location of the staged bytes
    pub path: PathBuf,
    /// Size of the staged bytes
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Declared media type, e.g. `image/jpeg`
    pub media_type: String,
}

/// Shared ephemeral directory for staged uploads
///
/// Cheap to clone; concurrent requests share the same directory and rely
/// on filename uniqueness rather than locking.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    policy: BatchPolicy,
}

impl StagingArea {
    /// Create a staging area rooted at `dir` with default limits
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: BatchPolicy::default(),
        }
    }

    /// With a custom batch policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the batch policy in force
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Get the staging directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stage one uploaded file
    ///
    /// Validates the declared media type and size before touching disk,
    /// then writes the bytes under a collision-resistant unique filename.
    /// The directory is created on first use if absent.
    pub async fn stage(
        &self,
        bytes: &[u8],
        media_type: &str,
        original_name: &str,
    ) -> Result<StagedImage, StagingError> {
        self.policy.check_file(media_type, bytes.len() as u64)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let handle = unique_handle(original_name, media_type);
        let path = self.dir.join(&handle);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(handle = %handle, size = bytes.len(), "staged image");

        Ok(StagedImage {
            handle,
            path,
            size_bytes: bytes.len() as u64,
            media_type: media_type.to_string(),
        })
    }

    /// Load the staged bytes behind a handle
    ///
    /// A handle whose file has already vanished is [`StagingError::NotFound`].
    pub async fn load(&self, handle: &str) -> Result<Vec<u8>, StagingError> {
        let path = self.resolve(handle)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StagingError::NotFound(handle.to_string()))
            }
            Err(e) => Err(StagingError::Io(e)),
        }
    }

    /// Release a staged file
    ///
    /// Idempotent: releasing an already-released or nonexistent handle is
    /// a no-op, which lets failure paths double-clean safely. Synchronous
    /// so the [`StagedBatch`] drop guard can reuse it.
    pub fn release(&self, handle: &str) {
        let Ok(path) = self.resolve(handle) else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(handle = %handle, "released staged image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(handle = %handle, error = %e, "release failed"),
        }
    }

    /// Resolve a handle to its path inside the staging directory
    ///
    /// Handles are bare filenames; anything with a path separator is
    /// rejected so callers cannot reach outside the staging directory.
    fn resolve(&self, handle: &str) -> Result<PathBuf, StagingError> {
        if handle.is_empty()
            || handle.contains('/')
            || handle.contains('\\')
            || handle.contains("..")
        {
            return Err(StagingError::MalformedHandle(handle.to_string()));
        }
        Ok(self.dir.join(handle))
    }
}

/// Generate a collision-resistant filename: millis + random suffix + extension
fn unique_handle(original_name: &str, media_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple();
    let ext = extension_for(original_name, media_type);
    format!("{millis}-{suffix}{ext}")
}

/// Extension from the original filename, falling back to the media type
fn extension_for(original_name: &str, media_type: &str) -> String {
    if let Some(ext) = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        return format!(".{ext}");
    }
    match media_type {
        "image/jpeg" => ".jpg".to_string(),
        "image/png" => ".png".to_string(),
        "image/gif" => ".gif".to_string(),
        "image/webp" => ".webp".to_string(),
        _ => String::new(),
    }
}

/// Release-guaranteed guard over the files staged for one request
///
/// Every file pushed into the batch is purged when the guard drops,
/// unless ownership is handed onward with [`StagedBatch::into_images`].
/// This covers every exit path: success, validation failure, and
/// mid-staging IO faults.
#[derive(Debug)]
pub struct StagedBatch {
    area: StagingArea,
    images: Vec<StagedImage>,
    armed: bool,
}

impl StagedBatch {
    /// Create an empty batch bound to a staging area
    #[inline]
    #[must_use]
    pub fn new(area: StagingArea) -> Self {
        Self {
            area,
            images: Vec::new(),
            armed: true,
        }
    }

    /// Take ownership of one staged image
    #[inline]
    pub fn push(&mut self, image: StagedImage) {
        self.images.push(image);
    }

    /// Number of images currently staged in this batch
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the batch holds no images
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// View the staged images
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[StagedImage] {
        &self.images
    }

    /// Disarm the guard and hand the staged files to the caller
    ///
    /// After this, the files survive the guard and must be purged by a
    /// later request (the analyze path re-wraps them).
    #[must_use]
    pub fn into_images(mut self) -> Vec<StagedImage> {
        self.armed = false;
        std::mem::take(&mut self.images)
    }

    /// Release everything staged in this batch now
    pub fn purge(&mut self) {
        for image in self.images.drain(..) {
            self.area.release(&image.handle);
        }
    }
}

impl Drop for StagedBatch {
    fn drop(&mut self) {
        if self.armed && !self.images.is_empty() {
            tracing::debug!(count = self.images.len(), "purging staged batch on drop");
            self.purge();
        }
    }
}
