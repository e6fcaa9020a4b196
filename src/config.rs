use anyhow::{Context, Error};
use serde::Deserialize;
use std::path::Path;

pub static DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3343";

/// Where points are written to: `{endpoint}/write/{org}/{bucket}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    pub bucket: String,
    pub org: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

impl ProxyConfig {
    pub fn new(bucket: impl Into<String>, org: impl Into<String>) -> Self {
        ProxyConfig {
            bucket: bucket.into(),
            org: org.into(),
            endpoint: default_endpoint(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn write_url(&self) -> String {
        // Trailing slashes of the endpoint are dropped, org and bucket are not encoded
        format!(
            "{}/write/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.org,
            self.bucket
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).context("Failed to parse proxy configuration")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json_str(&contents)
    }
}
