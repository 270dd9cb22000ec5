//! list_buckets command
//!
//! Logs the name of every bucket the credentials can see.

use s3ctl_core::{StorageConfig, ops};

use super::{ErrorPolicy, connect};
use crate::exit_code::ExitCode;

const POLICY: ErrorPolicy = ErrorPolicy::Propagate;

/// Execute the list_buckets command
pub async fn execute(config: &StorageConfig) -> ExitCode {
    let client = match connect(config, POLICY).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match ops::list_buckets(&client).await {
        Ok(buckets) => {
            tracing::debug!("{} bucket(s) listed", buckets.len());
            ExitCode::Success
        }
        Err(e) => POLICY.report("Failed to list buckets", &e),
    }
}
