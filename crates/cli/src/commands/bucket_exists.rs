//! bucket_exists command

use clap::Args;
use s3ctl_core::{StorageConfig, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

/// Check whether a bucket exists
#[derive(Args, Debug)]
pub struct BucketExistsArgs {
    /// Bucket name
    pub bucket_name: String,
}

/// Execute the bucket_exists command
///
/// The existence check is only logged; both answers exit with success.
pub async fn execute(args: BucketExistsArgs, config: &StorageConfig) -> ExitCode {
    let client = match connect(config, ErrorPolicy::LogAndContinue).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    ops::bucket_exists(&client, &args.bucket_name).await;
    ExitCode::Success
}
