//! Bucket and upload operations
//!
//! Each operation issues one or two calls through an [`ObjectStore`] and logs
//! the outcome. All of them return a `Result`; whether a failure ends the
//! process is decided by the caller.

use std::path::Path;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::mime;
use crate::traits::{BucketInfo, ObjectStore};

/// Outcome of emptying a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyOutcome {
    /// The listing returned no objects; nothing was deleted
    AlreadyEmpty,

    /// One batch delete was issued for a single listing page
    Emptied {
        deleted: usize,
        failed: Vec<String>,
        /// The listing had more pages that were not fetched
        truncated: bool,
    },
}

/// Details of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub mime_type: &'static str,
    pub size_bytes: u64,
}

/// Outcome of an upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(UploadReceipt),
    /// Content type not in the allow-set; the service was not contacted
    Rejected { mime_type: &'static str },
}

/// List all buckets, logging each name in service order
pub async fn list_buckets(store: &dyn ObjectStore) -> Result<Vec<BucketInfo>> {
    let buckets = store.list_buckets().await?;

    for bucket in &buckets {
        tracing::info!("{}", bucket.name);
        if let Some(created) = bucket.created {
            tracing::debug!(bucket = %bucket.name, %created, "bucket creation date");
        }
    }

    Ok(buckets)
}

/// Create a bucket in the configured region
pub async fn create_bucket(
    store: &dyn ObjectStore,
    config: &StorageConfig,
    bucket: &str,
) -> Result<()> {
    let location = config.location_constraint().map(str::to_string);
    tracing::debug!(bucket, ?location, "creating bucket");

    store.create_bucket(bucket, location).await?;

    tracing::info!(
        "Bucket {bucket} created successfully in region {}.",
        config.region()
    );
    Ok(())
}

/// Delete every object from one listing page of a bucket
///
/// Only the first page is fetched. Objects beyond it stay in place and a
/// warning is logged.
pub async fn empty_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<EmptyOutcome> {
    let listing = store.list_objects(bucket).await?;

    if listing.keys.is_empty() {
        tracing::info!("Bucket {bucket} is already empty.");
        return Ok(EmptyOutcome::AlreadyEmpty);
    }

    let requested = listing.keys.len();
    let result = store.delete_objects(bucket, listing.keys).await?;

    if !result.failed.is_empty() {
        tracing::warn!(
            "Failed to delete {} of {requested} objects in {bucket}: {:?}",
            result.failed.len(),
            result.failed
        );
    }
    if listing.truncated {
        tracing::warn!(
            "Bucket {bucket} has more objects than one listing page; only the first {requested} were deleted"
        );
    }

    tracing::info!("All objects in bucket {bucket} have been deleted.");
    Ok(EmptyOutcome::Emptied {
        deleted: result.deleted.len(),
        failed: result.failed,
        truncated: listing.truncated,
    })
}

/// Empty a bucket (best-effort) and then delete it
///
/// A failure while emptying is logged and does not stop the delete request.
pub async fn delete_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<()> {
    if let Err(e) = empty_bucket(store, bucket).await {
        tracing::error!("Error emptying bucket {bucket}: {e}");
    }

    store.delete_bucket(bucket).await?;

    tracing::info!("Bucket {bucket} deleted successfully.");
    Ok(())
}

/// Check whether a bucket exists
///
/// Any HEAD failure counts as absence, including permission errors.
pub async fn bucket_exists(store: &dyn ObjectStore, bucket: &str) -> bool {
    match store.head_bucket(bucket).await {
        Ok(()) => {
            tracing::info!("Bucket exists.");
            true
        }
        Err(e) => {
            tracing::debug!(bucket, error = %e, "head bucket failed");
            tracing::info!("Bucket does not exist.");
            false
        }
    }
}

/// Upload a local file after checking its content type
///
/// Only the file header is read here; the store streams the body from disk.
/// No ACL is attached to the object.
pub async fn upload_file(
    store: &dyn ObjectStore,
    file_path: &Path,
    bucket: &str,
    key: &str,
) -> Result<UploadOutcome> {
    let mime_type = mime::sniff_file(file_path)?;

    if !mime::is_allowed(mime_type) {
        tracing::error!(detected = mime_type, "{}", mime::INVALID_TYPE_MESSAGE);
        return Ok(UploadOutcome::Rejected { mime_type });
    }

    let size_bytes = tokio::fs::metadata(file_path).await?.len();
    tracing::debug!(bucket, key, mime_type, size_bytes, "uploading file");

    store
        .put_file(
            bucket,
            key,
            file_path,
            size_bytes,
            Some(mime_type.to_string()),
        )
        .await?;

    tracing::info!(
        "File {} uploaded to {bucket}/{key}.",
        file_path.display()
    );
    Ok(UploadOutcome::Uploaded(UploadReceipt {
        bucket: bucket.to_string(),
        key: key.to_string(),
        mime_type,
        size_bytes,
    }))
}

/// Remove a bucket's public access block
pub async fn delete_public_access_block(store: &dyn ObjectStore, bucket: &str) -> Result<()> {
    store.delete_public_access_block(bucket).await?;

    tracing::info!("Public access block removed from {bucket}.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_REGION;
    use crate::error::Error;
    use crate::traits::{DeleteResult, MockObjectStore, ObjectListing};
    use mockall::Sequence;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn config_with_region(region: &str) -> StorageConfig {
        let region = region.to_string();
        StorageConfig::from_lookup(|key| (key == ENV_REGION).then(|| region.clone())).unwrap()
    }

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_list_buckets_preserves_order() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().times(1).returning(|| {
            Ok(vec![
                BucketInfo::new("zeta"),
                BucketInfo::new("alpha"),
                BucketInfo::new("mid"),
            ])
        });

        let buckets = list_buckets(&store).await.unwrap();
        let names: Vec<_> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_list_buckets_propagates_error() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .returning(|| Err(Error::Auth("InvalidAccessKeyId".into())));

        let err = list_buckets(&store).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_create_bucket_default_region_has_no_constraint() {
        let mut store = MockObjectStore::new();
        store
            .expect_create_bucket()
            .withf(|bucket, location| bucket == "my-bucket" && location.is_none())
            .times(1)
            .returning(|_, _| Ok(()));

        create_bucket(&store, &config_with_region("us-east-1"), "my-bucket")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_bucket_other_region_sets_constraint() {
        let mut store = MockObjectStore::new();
        store
            .expect_create_bucket()
            .withf(|bucket, location| {
                bucket == "my-bucket" && location.as_deref() == Some("eu-west-1")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        create_bucket(&store, &config_with_region("eu-west-1"), "my-bucket")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_bucket_propagates_conflict() {
        let mut store = MockObjectStore::new();
        store
            .expect_create_bucket()
            .returning(|_, _| Err(Error::Conflict("BucketAlreadyOwnedByYou".into())));

        let err = create_bucket(&store, &StorageConfig::default(), "taken")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_empty_bucket_no_objects_skips_delete() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_| Ok(ObjectListing::default()));
        store.expect_delete_objects().never();

        let outcome = empty_bucket(&store, "empty").await.unwrap();
        assert_eq!(outcome, EmptyOutcome::AlreadyEmpty);
    }

    #[tokio::test]
    async fn test_empty_bucket_single_batch_with_listed_keys() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_| {
            Ok(ObjectListing {
                keys: vec!["a.png".into(), "dir/b.jpg".into(), "c.mp4".into()],
                truncated: false,
            })
        });
        store
            .expect_delete_objects()
            .withf(|bucket, keys| {
                bucket == "photos" && keys == &vec!["a.png", "dir/b.jpg", "c.mp4"]
            })
            .times(1)
            .returning(|_, keys| {
                Ok(DeleteResult {
                    deleted: keys,
                    failed: vec![],
                })
            });

        let outcome = empty_bucket(&store, "photos").await.unwrap();
        assert_eq!(
            outcome,
            EmptyOutcome::Emptied {
                deleted: 3,
                failed: vec![],
                truncated: false,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_bucket_does_not_fetch_second_page() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_| {
            Ok(ObjectListing {
                keys: vec!["first".into()],
                truncated: true,
            })
        });
        store
            .expect_delete_objects()
            .times(1)
            .returning(|_, keys| {
                Ok(DeleteResult {
                    deleted: keys,
                    failed: vec![],
                })
            });

        let outcome = empty_bucket(&store, "big").await.unwrap();
        assert!(matches!(
            outcome,
            EmptyOutcome::Emptied {
                deleted: 1,
                truncated: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_bucket_reports_partial_failure() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().returning(|_| {
            Ok(ObjectListing {
                keys: vec!["ok".into(), "locked".into()],
                truncated: false,
            })
        });
        store.expect_delete_objects().returning(|_, _| {
            Ok(DeleteResult {
                deleted: vec!["ok".into()],
                failed: vec!["locked".into()],
            })
        });

        let outcome = empty_bucket(&store, "mixed").await.unwrap();
        assert_eq!(
            outcome,
            EmptyOutcome::Emptied {
                deleted: 1,
                failed: vec!["locked".into()],
                truncated: false,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_bucket_empties_first() {
        let mut seq = Sequence::new();
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ObjectListing::default()));
        store
            .expect_delete_bucket()
            .withf(|bucket| bucket == "empty-already")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        delete_bucket(&store, "empty-already").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_bucket_continues_after_empty_failure() {
        let mut seq = Sequence::new();
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::Network("connection reset".into())));
        store
            .expect_delete_bucket()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::Conflict("BucketNotEmpty".into())));

        let err = delete_bucket(&store, "stubborn").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_bucket_exists() {
        let mut store = MockObjectStore::new();
        store.expect_head_bucket().returning(|_| Ok(()));
        assert!(bucket_exists(&store, "present").await);
    }

    #[tokio::test]
    async fn test_bucket_exists_conflates_errors_with_absence() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .withf(|bucket| bucket == "ghost-bucket")
            .returning(|_| Err(Error::Auth("AccessDenied".into())));
        assert!(!bucket_exists(&store, "ghost-bucket").await);

        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .returning(|_| Err(Error::NotFound("ghost-bucket".into())));
        assert!(!bucket_exists(&store, "ghost-bucket").await);
    }

    #[tokio::test]
    async fn test_upload_rejects_text_without_calling_store() {
        let file = temp_file(b"this is a plain text file");
        let mut store = MockObjectStore::new();
        store.expect_put_file().never();

        let outcome = upload_file(&store, file.path(), "my-bucket", "key1")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                mime_type: mime::UNKNOWN_MIME_TYPE
            }
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_gif() {
        let file = temp_file(b"GIF89a\x01\x00\x01\x00\x00\x00");
        let mut store = MockObjectStore::new();
        store.expect_put_file().never();

        let outcome = upload_file(&store, file.path(), "my-bucket", "anim")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                mime_type: "image/gif"
            }
        );
    }

    #[tokio::test]
    async fn test_upload_png() {
        let file = temp_file(PNG);
        let expected_path = file.path().to_path_buf();
        let mut store = MockObjectStore::new();
        store
            .expect_put_file()
            .withf(move |bucket, key, path, size, content_type| {
                bucket == "my-bucket"
                    && key == "photos/pic.txt"
                    && path == expected_path.as_path()
                    && *size == PNG.len() as u64
                    && content_type.as_deref() == Some("image/png")
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));

        let outcome = upload_file(&store, file.path(), "my-bucket", "photos/pic.txt")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Uploaded(UploadReceipt {
                bucket: "my-bucket".into(),
                key: "photos/pic.txt".into(),
                mime_type: "image/png",
                size_bytes: PNG.len() as u64,
            })
        );
    }

    #[tokio::test]
    async fn test_upload_passes_file_size_to_store() {
        let mut content = PNG.to_vec();
        content.resize(2 * 1024 * 1024, 0xAB);
        let file = temp_file(&content);
        let mut store = MockObjectStore::new();
        store
            .expect_put_file()
            .withf(|_, _, _, size, _| *size == 2 * 1024 * 1024)
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));

        let outcome = upload_file(&store, file.path(), "media", "clip")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            UploadOutcome::Uploaded(UploadReceipt {
                size_bytes: 2_097_152,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let mut store = MockObjectStore::new();
        store.expect_put_file().never();

        let err = upload_file(&store, &missing, "my-bucket", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_upload_propagates_store_error() {
        let file = temp_file(PNG);
        let mut store = MockObjectStore::new();
        store
            .expect_put_file()
            .returning(|_, _, _, _, _| Err(Error::NotFound("no-such-bucket".into())));

        let err = upload_file(&store, file.path(), "no-such-bucket", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_public_access_block() {
        let mut store = MockObjectStore::new();
        store
            .expect_delete_public_access_block()
            .withf(|bucket| bucket == "site")
            .times(1)
            .returning(|_| Ok(()));
        delete_public_access_block(&store, "site").await.unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_delete_public_access_block()
            .returning(|_| Err(Error::Auth("AccessDenied".into())));
        assert!(delete_public_access_block(&store, "site").await.is_err());
    }
}
