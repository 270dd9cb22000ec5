//! Storage configuration
//!
//! Credentials, region and an optional endpoint are read once from the
//! environment into a [`StorageConfig`] that is handed to client construction.

use url::Url;

use crate::error::{Error, Result};

/// Region in which buckets are created without a location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Connection settings for the storage service
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Access key ID
    pub access_key_id: Option<String>,

    /// Secret access key
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials
    pub session_token: Option<String>,

    /// Configured region (None falls back to [`DEFAULT_REGION`])
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset. The endpoint, when present, must be
    /// an absolute http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let endpoint_url = get(ENV_ENDPOINT_URL);
        if let Some(endpoint) = &endpoint_url {
            validate_endpoint(endpoint)?;
        }

        Ok(Self {
            access_key_id: get(ENV_ACCESS_KEY_ID),
            secret_access_key: get(ENV_SECRET_ACCESS_KEY),
            session_token: get(ENV_SESSION_TOKEN),
            region: get(ENV_REGION),
            endpoint_url,
        })
    }

    /// Effective region
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Location constraint to send with a create-bucket request
    ///
    /// The default region rejects an explicit constraint, so it gets none.
    pub fn location_constraint(&self) -> Option<&str> {
        let region = self.region();
        if region == DEFAULT_REGION {
            None
        } else {
            Some(region)
        }
    }

    /// Whether static credentials are fully configured
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

// Secrets stay out of debug logs.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("{ENV_ENDPOINT_URL} '{endpoint}' is invalid: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{ENV_ENDPOINT_URL} must use http or https, got '{other}'"
        ))),
    }
}
