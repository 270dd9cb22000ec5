//! CLI command definitions and execution
//!
//! Every storage command builds its own client from the shared
//! [`StorageConfig`], runs one operation and maps the result to an exit code.

use clap::{CommandFactory, Parser, Subcommand};
use s3ctl_core::{Error, StorageConfig};
use s3ctl_s3::S3Client;

use crate::exit_code::ExitCode;

mod bucket_exists;
mod completions;
mod create_bucket;
mod delete_bucket;
mod delete_public_access_block;
mod list_buckets;
mod upload_file;

/// s3ctl - S3 bucket management CLI
///
/// Manages buckets and uploads media files. Credentials and region are read
/// from AWS_* environment variables or a local .env file.
#[derive(Parser, Debug)]
#[command(name = "s3ctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value = "false", conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Commands {
    /// List all S3 buckets
    ListBuckets,

    /// Create an S3 bucket
    CreateBucket(create_bucket::CreateBucketArgs),

    /// Delete an S3 bucket
    DeleteBucket(delete_bucket::DeleteBucketArgs),

    /// Check if an S3 bucket exists
    BucketExists(bucket_exists::BucketExistsArgs),

    /// Upload a file to S3
    UploadFile(upload_file::UploadFileArgs),

    /// Delete public access block
    DeletePublicAccessBlock(delete_public_access_block::DeletePublicAccessBlockArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// How a command reports a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the error and exit with the error's code
    Propagate,

    /// Log the error and exit successfully
    LogAndContinue,
}

impl ErrorPolicy {
    /// Log a failure and pick the exit code
    pub fn report(self, message: &str, err: &Error) -> ExitCode {
        tracing::error!("{message}: {err}");
        match self {
            Self::Propagate => ExitCode::from_error(err),
            Self::LogAndContinue => ExitCode::Success,
        }
    }
}

/// Build a fresh client for one command
async fn connect(config: &StorageConfig, policy: ErrorPolicy) -> Result<S3Client, ExitCode> {
    S3Client::new(config)
        .await
        .map_err(|e| policy.report("Failed to create S3 client", &e))
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let command = match cli.command {
        None => return print_help(),
        Some(Commands::Completions(args)) => return completions::execute(args),
        Some(command) => command,
    };

    let config = match StorageConfig::from_env() {
        Ok(config) => config,
        Err(e) => return ErrorPolicy::Propagate.report("Invalid environment", &e),
    };
    tracing::debug!(?config, "storage configuration");

    match command {
        Commands::ListBuckets => list_buckets::execute(&config).await,
        Commands::CreateBucket(args) => create_bucket::execute(args, &config).await,
        Commands::DeleteBucket(args) => delete_bucket::execute(args, &config).await,
        Commands::BucketExists(args) => bucket_exists::execute(args, &config).await,
        Commands::UploadFile(args) => upload_file::execute(args, &config).await,
        Commands::DeletePublicAccessBlock(args) => {
            delete_public_access_block::execute(args, &config).await
        }
        Commands::Completions(args) => completions::execute(args),
    }
}

fn print_help() -> ExitCode {
    match Cli::command().print_help() {
        Ok(()) => {
            println!();
            ExitCode::Success
        }
        Err(e) => {
            tracing::error!("Failed to print help: {e}");
            ExitCode::GeneralError
        }
    }
}
