//! Multipart upload support
//!
//! Files above the threshold are sent in sequential parts read straight from
//! disk, so memory use stays at one part regardless of file size.

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_smithy_types::byte_stream::Length;

use s3ctl_core::{Error, Result};

use crate::client::map_sdk_error;

/// Files at or above this size use multipart upload: 8 MiB
pub const MULTIPART_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Default part size: 8 MiB
pub const DEFAULT_PART_SIZE: u64 = 8 * 1024 * 1024;

/// Minimum part size: 5 MiB (S3 requirement)
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum part size: 5 GiB
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Maximum number of parts: 10,000 (S3 limit)
pub const MAX_PARTS: u64 = 10_000;

/// How a file of a given size is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPlan {
    /// One PutObject request streamed from disk
    Single,

    /// Sequential UploadPart requests
    Multipart { part_size: u64, parts: u64 },
}

impl UploadPlan {
    /// Pick the upload strategy for a file size
    pub fn for_size(file_size: u64) -> Self {
        if file_size < MULTIPART_THRESHOLD {
            return Self::Single;
        }

        let part_size = calculate_part_size(file_size);
        Self::Multipart {
            part_size,
            parts: file_size.div_ceil(part_size),
        }
    }
}

/// Calculate a part size that keeps the upload within the part limit
pub fn calculate_part_size(file_size: u64) -> u64 {
    if file_size.div_ceil(DEFAULT_PART_SIZE) <= MAX_PARTS {
        DEFAULT_PART_SIZE
    } else {
        file_size
            .div_ceil(MAX_PARTS)
            .clamp(MIN_PART_SIZE, MAX_PART_SIZE)
    }
}

/// Byte range `[start, end)` of a 1-based part
pub fn part_byte_range(part_number: u64, part_size: u64, total_size: u64) -> (u64, u64) {
    let start = (part_number - 1) * part_size;
    let end = (start + part_size).min(total_size);
    (start, end)
}

/// Upload a file in parts, aborting the upload if any part fails
pub(crate) async fn upload(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    path: &Path,
    file_size: u64,
    part_size: u64,
    content_type: Option<String>,
) -> Result<()> {
    let created = client
        .create_multipart_upload()
        .bucket(bucket)
        .key(key)
        .set_content_type(content_type)
        .send()
        .await
        .map_err(map_sdk_error)?;

    let upload_id = created
        .upload_id()
        .ok_or_else(|| Error::General("Service returned no multipart upload id".into()))?
        .to_string();

    tracing::debug!(bucket, key, %upload_id, part_size, "multipart upload started");

    match upload_parts(client, bucket, key, &upload_id, path, file_size, part_size).await {
        Ok(parts) => {
            let completed = CompletedMultipartUpload::builder()
                .set_parts(Some(parts))
                .build();

            client
                .complete_multipart_upload()
                .bucket(bucket)
                .key(key)
                .upload_id(&upload_id)
                .multipart_upload(completed)
                .send()
                .await
                .map_err(map_sdk_error)?;

            Ok(())
        }
        Err(e) => {
            if let Err(abort_err) = client
                .abort_multipart_upload()
                .bucket(bucket)
                .key(key)
                .upload_id(&upload_id)
                .send()
                .await
            {
                tracing::warn!("Failed to abort multipart upload {upload_id}: {abort_err}");
            }
            Err(e)
        }
    }
}

async fn upload_parts(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
    path: &Path,
    file_size: u64,
    part_size: u64,
) -> Result<Vec<CompletedPart>> {
    let parts = file_size.div_ceil(part_size);
    let mut completed = Vec::new();

    for part_number in 1..=parts {
        let (start, end) = part_byte_range(part_number, part_size, file_size);

        let body = ByteStream::read_from()
            .path(path)
            .offset(start)
            .length(Length::Exact(end - start))
            .build()
            .await
            .map_err(|e| Error::General(format!("Failed to read {}: {e}", path.display())))?;

        let part_number = i32::try_from(part_number)
            .map_err(|_| Error::General(format!("Part number {part_number} out of range")))?;

        let response = client
            .upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(body)
            .send()
            .await
            .map_err(map_sdk_error)?;

        tracing::debug!("uploaded part {part_number}/{parts} of {key}");

        completed.push(
            CompletedPart::builder()
                .part_number(part_number)
                .set_e_tag(response.e_tag().map(|t| t.to_string()))
                .build(),
        );
    }

    Ok(completed)
}
