//! delete_public_access_block command
//!
//! Removes a bucket's public access block so public policies can apply.

use clap::Args;
use s3ctl_core::{StorageConfig, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

const POLICY: ErrorPolicy = ErrorPolicy::LogAndContinue;

/// Delete a bucket's public access block
#[derive(Args, Debug)]
pub struct DeletePublicAccessBlockArgs {
    /// Bucket name
    pub bucket_name: String,
}

/// Execute the delete_public_access_block command
pub async fn execute(args: DeletePublicAccessBlockArgs, config: &StorageConfig) -> ExitCode {
    let client = match connect(config, POLICY).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::delete_public_access_block(&client, &args.bucket_name).await {
        Ok(()) => ExitCode::Success,
        Err(e) => POLICY.report("Error removing public access block", &e),
    }
}
