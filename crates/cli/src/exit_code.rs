//! Exit code definitions for the s3ctl CLI

use s3ctl_core::Error;

/// Exit codes for the s3ctl CLI application.
///
/// Commands that log failures without stopping (`delete_bucket`,
/// `bucket_exists`, `delete_public_access_block`) always exit with `Success`.
/// So does an upload whose file type is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid configuration
    UsageError = 2,

    /// Network error: connection refused, timeout
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Resource not found: bucket does not exist
    NotFound = 5,

    /// Conflict: bucket already exists or is not empty
    Conflict = 6,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code matching an operation error
    pub const fn from_error(err: &Error) -> Self {
        match err {
            Error::Config(_) => Self::UsageError,
            Error::Network(_) => Self::NetworkError,
            Error::Auth(_) => Self::AuthError,
            Error::NotFound(_) => Self::NotFound,
            Error::Conflict(_) => Self::Conflict,
            Error::Io(_) | Error::General(_) => Self::GeneralError,
        }
    }
}
