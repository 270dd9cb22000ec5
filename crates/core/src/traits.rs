//! ObjectStore trait definition
//!
//! This trait defines the storage calls the operations need.
//! It keeps the operations decoupled from the S3 SDK and lets tests mock it.

use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::Result;

/// A bucket as reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    /// Bucket name
    pub name: String,

    /// Creation timestamp, when the service reports one
    pub created: Option<Timestamp>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: None,
        }
    }
}

/// One page of an object listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Object keys in service order
    pub keys: Vec<String>,

    /// Whether more objects exist beyond this page
    pub truncated: bool,
}

/// Result of a batch delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteResult {
    /// Keys the service confirmed as deleted
    pub deleted: Vec<String>,

    /// Keys the service reported errors for
    pub failed: Vec<String>,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List buckets owned by the caller
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Create a bucket, optionally pinned to a region
    async fn create_bucket(&self, bucket: &str, location: Option<String>) -> Result<()>;

    /// List a single page of objects in a bucket
    async fn list_objects(&self, bucket: &str) -> Result<ObjectListing>;

    /// Delete the given keys in one batch request
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult>;

    /// Delete a bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// HEAD a bucket; succeeds only if it is reachable
    async fn head_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload a local file of `size` bytes, streaming it from disk
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        content_type: Option<String>,
    ) -> Result<()>;

    /// Remove the bucket's public access block configuration
    async fn delete_public_access_block(&self, bucket: &str) -> Result<()>;
}
