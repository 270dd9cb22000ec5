//! s3ctl - S3 bucket management CLI
//!
//! Lists, creates and deletes buckets, checks whether a bucket exists, uploads
//! media files and removes public access blocks.

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use s3ctl::commands::{self, Cli};

#[tokio::main]
async fn main() {
    // .env is optional; load it before anything reads the environment
    let dotenv_path = dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(filter)
        .init();

    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
