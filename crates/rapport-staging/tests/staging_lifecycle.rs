//! Functional tests for the staging lifecycle.
//!
//! Core guarantees exercised here:
//! - No orphaned temporary files on any failure path: a rejected batch
//!   purges everything it had already staged.
//! - Handles are unique under concurrent staging of identically-named
//!   files into the same shared directory.
//! - Release is idempotent so double-cleanup during failure handling is
//!   harmless.

use rapport_staging::{BatchError, BatchPolicy, StagedBatch, StagingArea};

fn staged_file_count(dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0)
}

/// A batch below the minimum is rejected and leaves zero staged files,
/// even though some files had already been written before the count
/// check ran.
#[tokio::test]
async fn undersized_batch_leaves_no_staged_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingArea::new(dir.path());
    let policy = BatchPolicy::new();

    let mut batch = StagedBatch::new(store.clone());
    for i in 0..4 {
        let staged = store
            .stage(b"jpegdata", "image/jpeg", &format!("photo{i}.jpg"))
            .await
            .unwrap();
        batch.push(staged);
    }
    assert_eq!(staged_file_count(&dir), 4);

    let err = policy.check_count(batch.len()).unwrap_err();
    assert!(matches!(err, BatchError::BatchTooSmall { actual: 4, minimum: 5 }));

    batch.purge();
    assert_eq!(staged_file_count(&dir), 0);
}

/// An accepted batch yields one unique handle per image and the files
/// survive once the guard is disarmed.
#[tokio::test]
async fn accepted_batch_yields_unique_handles() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingArea::new(dir.path());

    let mut batch = StagedBatch::new(store.clone());
    for _ in 0..6 {
        let staged = store
            .stage(b"jpegdata", "image/jpeg", "same-name.jpg")
            .await
            .unwrap();
        batch.push(staged);
    }
    assert!(store.policy().check_count(batch.len()).is_ok());

    let images = batch.into_images();
    assert_eq!(images.len(), 6);
    assert_eq!(staged_file_count(&dir), 6);

    let mut handles: Vec<_> = images.iter().map(|i| i.handle.clone()).collect();
    handles.sort();
    handles.dedup();
    assert_eq!(handles.len(), 6);
}

/// Concurrent staging into the shared directory never collides: filename
/// uniqueness is the only coordination mechanism, so this is the property
/// everything else leans on.
#[tokio::test]
async fn concurrent_staging_does_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingArea::new(dir.path());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .stage(b"jpegdata", "image/jpeg", "burst.jpg")
                    .await
                    .unwrap()
                    .handle
            })
        })
        .collect();

    let mut handles = Vec::new();
    for task in tasks {
        handles.push(task.await.unwrap());
    }
    handles.sort();
    handles.dedup();
    assert_eq!(handles.len(), 16);
    assert_eq!(staged_file_count(&dir), 16);
}

/// A non-image file among valid images rejects only itself; the batch is
/// then judged on the surviving count.
#[tokio::test]
async fn per_file_rejection_leaves_batch_judged_on_survivors() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingArea::new(dir.path());

    let mut batch = StagedBatch::new(store.clone());
    let uploads = [
        ("a.jpg", "image/jpeg"),
        ("b.jpg", "image/jpeg"),
        ("virus.exe", "application/octet-stream"),
        ("c.jpg", "image/jpeg"),
        ("d.jpg", "image/jpeg"),
        ("e.jpg", "image/jpeg"),
    ];
    let mut rejected = 0;
    for (name, media_type) in uploads {
        match store.stage(b"data", media_type, name).await {
            Ok(staged) => batch.push(staged),
            Err(e) => {
                assert!(e.is_per_file());
                rejected += 1;
            }
        }
    }

    assert_eq!(rejected, 1);
    assert_eq!(batch.len(), 5);
    assert!(store.policy().check_count(batch.len()).is_ok());
}

/// Releasing through the guard twice over is safe: purge, then drop.
#[tokio::test]
async fn double_cleanup_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingArea::new(dir.path());

    let mut batch = StagedBatch::new(store.clone());
    let staged = store.stage(b"x", "image/jpeg", "x.jpg").await.unwrap();
    let handle = staged.handle.clone();
    batch.push(staged);

    batch.purge();
    store.release(&handle);
    drop(batch);
    assert_eq!(staged_file_count(&dir), 0);
}
