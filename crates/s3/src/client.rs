//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3ctl-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};

use s3ctl_core::{
    BucketInfo, DeleteResult, Error, ObjectListing, ObjectStore, Result, StorageConfig,
};

use crate::multipart::{self, UploadPlan};

/// Credential provider name reported by the SDK for environment keys
const PROVIDER_NAME: &str = "s3ctl-environment";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from the storage configuration
    ///
    /// Static credentials are used when both keys are configured; otherwise the
    /// SDK's default provider chain applies. No request is sent here.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region().to_string()));

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                config.session_token.clone(),
                None, // expiry
                PROVIDER_NAME,
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        // Custom endpoints are usually S3-compatible servers without virtual-host support
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some())
            .build();

        tracing::debug!(
            region = config.region(),
            endpoint = ?config.endpoint_url,
            static_credentials = config.has_static_credentials(),
            "S3 client constructed"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(map_sdk_error)?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| BucketInfo {
                name: b.name().unwrap_or_default().to_string(),
                created: b.creation_date().and_then(to_timestamp),
            })
            .collect();

        Ok(buckets)
    }

    async fn create_bucket(&self, bucket: &str, location: Option<String>) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        if let Some(region) = location {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }

        request.send().await.map_err(map_sdk_error)?;

        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<ObjectListing> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|o| o.key().map(|k| k.to_string()))
            .collect();

        Ok(ObjectListing {
            keys,
            truncated: response.is_truncated().unwrap_or(false),
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult> {
        if keys.is_empty() {
            return Ok(DeleteResult::default());
        }

        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::General(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let deleted = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(|k| k.to_string()))
            .collect();

        let failed = response
            .errors()
            .iter()
            .filter_map(|e| e.key().map(|k| k.to_string()))
            .collect();

        Ok(DeleteResult { deleted, failed })
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        content_type: Option<String>,
    ) -> Result<()> {
        match UploadPlan::for_size(size) {
            UploadPlan::Single => {
                let body = ByteStream::from_path(path).await.map_err(|e| {
                    Error::General(format!("Failed to read {}: {e}", path.display()))
                })?;

                self.inner
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(body)
                    .set_content_type(content_type)
                    .send()
                    .await
                    .map_err(map_sdk_error)?;

                Ok(())
            }
            UploadPlan::Multipart { part_size, parts } => {
                tracing::debug!(bucket, key, size, parts, "using multipart upload");
                multipart::upload(
                    &self.inner,
                    bucket,
                    key,
                    path,
                    size,
                    part_size,
                    content_type,
                )
                .await
            }
        }
    }

    async fn delete_public_access_block(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_public_access_block()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }
}

/// Convert an SDK failure into an s3ctl error
pub(crate) fn map_sdk_error<E, R>(err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();

    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => Error::Network(message),
        _ => classify(err.as_service_error().and_then(|e| e.code()), message),
    }
}

/// Map an S3 error code to an error kind
fn classify(code: Option<&str>, message: String) -> Error {
    match code {
        Some(
            "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(message),
        Some("NoSuchBucket" | "NotFound" | "NoSuchPublicAccessBlockConfiguration") => {
            Error::NotFound(message)
        }
        Some(
            "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty"
            | "OperationAborted",
        ) => Error::Conflict(message),
        _ => Error::General(message),
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}
