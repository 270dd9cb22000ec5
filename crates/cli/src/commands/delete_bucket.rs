//! delete_bucket command
//!
//! Empties a bucket (first listing page only) and deletes it. Failures are
//! logged; the command still exits successfully.

use clap::Args;
use s3ctl_core::{StorageConfig, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

const POLICY: ErrorPolicy = ErrorPolicy::LogAndContinue;

/// Delete a bucket
#[derive(Args, Debug)]
pub struct DeleteBucketArgs {
    /// Bucket name
    pub bucket_name: String,
}

/// Execute the delete_bucket command
pub async fn execute(args: DeleteBucketArgs, config: &StorageConfig) -> ExitCode {
    let client = match connect(config, POLICY).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::delete_bucket(&client, &args.bucket_name).await {
        Ok(()) => ExitCode::Success,
        Err(e) => POLICY.report("Error deleting bucket", &e),
    }
}
