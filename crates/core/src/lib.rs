//! s3ctl-core: Core library for the s3ctl CLI
//!
//! This crate provides:
//! - Storage configuration read from the environment
//! - The ObjectStore trait the storage adapter implements
//! - Upload content-type policy
//! - The bucket and upload operations
//!
//! It does not depend on any S3 SDK, so operations can be tested
//! against a mocked store.

pub mod config;
pub mod error;
pub mod mime;
pub mod ops;
pub mod traits;

pub use config::StorageConfig;
pub use error::{Error, Result};
pub use ops::{EmptyOutcome, UploadOutcome, UploadReceipt};
pub use traits::{BucketInfo, DeleteResult, ObjectListing, ObjectStore};
