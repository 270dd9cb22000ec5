//! create_bucket command
//!
//! Creates a bucket in the configured region.

use clap::Args;
use s3ctl_core::{StorageConfig, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

const POLICY: ErrorPolicy = ErrorPolicy::Propagate;

/// Create a bucket
#[derive(Args, Debug)]
pub struct CreateBucketArgs {
    /// Bucket name
    pub bucket_name: String,
}

/// Execute the create_bucket command
pub async fn execute(args: CreateBucketArgs, config: &StorageConfig) -> ExitCode {
    let client = match connect(config, POLICY).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::create_bucket(&client, config, &args.bucket_name).await {
        Ok(()) => ExitCode::Success,
        Err(e) => POLICY.report(
            &format!("Failed to create bucket {}", args.bucket_name),
            &e,
        ),
    }
}
