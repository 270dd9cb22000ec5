//! upload_file command
//!
//! Uploads a local image or video after checking its content type.

use std::path::PathBuf;

use clap::Args;
use s3ctl_core::{StorageConfig, UploadOutcome, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

const POLICY: ErrorPolicy = ErrorPolicy::Propagate;

/// Upload a file
#[derive(Args, Debug)]
pub struct UploadFileArgs {
    /// Local file path
    pub file_path: PathBuf,

    /// Bucket name
    pub bucket_name: String,

    /// Object name in S3
    pub object_name: String,
}

/// Execute the upload_file command
pub async fn execute(args: UploadFileArgs, config: &StorageConfig) -> ExitCode {
    let client = match connect(config, POLICY).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::upload_file(&client, &args.file_path, &args.bucket_name, &args.object_name).await
    {
        Ok(UploadOutcome::Uploaded(receipt)) => {
            tracing::debug!(
                mime_type = receipt.mime_type,
                size_bytes = receipt.size_bytes,
                "upload complete"
            );
            ExitCode::Success
        }
        // logged by the operation; a rejected type is not a failure
        Ok(UploadOutcome::Rejected { .. }) => ExitCode::Success,
        Err(e) => POLICY.report(
            &format!("Failed to upload {}", args.file_path.display()),
            &e,
        ),
    }
}
