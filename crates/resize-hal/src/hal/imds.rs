//! Instance metadata service client (IMDSv2).

use super::MetadataOps;
use crate::{HalError, HalResult};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";
pub const ENDPOINT_ENV: &str = "AWS_EC2_METADATA_SERVICE_ENDPOINT";

const TOKEN_PATH: &str = "/latest/api/token";
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
const TOKEN_TTL_SECS: &str = "300";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ImdsClient {
    endpoint: String,
}

impl ImdsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint from `AWS_EC2_METADATA_SERVICE_ENDPOINT`, or the link-local default.
    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }

    fn client(&self) -> HalResult<Client> {
        Ok(Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("resize-thyself")
            .build()?)
    }

    fn token(&self, client: &Client) -> HalResult<String> {
        let response = client
            .put(format!("{}{}", self.endpoint, TOKEN_PATH))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECS)
            .send()
            .map_err(|e| HalError::MetadataUnavailable(format!("token request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(HalError::MetadataUnavailable(format!(
                "token request returned {}",
                response.status()
            )));
        }
        Ok(response.text()?.trim().to_string())
    }

    /// Fetch `/latest/meta-data/<key>`.
    pub fn get_metadata(&self, key: &str) -> HalResult<String> {
        let client = self.client()?;
        let token = self.token(&client)?;
        let url = format!("{}/latest/meta-data/{}", self.endpoint, key);
        let response = client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .map_err(|e| HalError::MetadataUnavailable(format!("{key}: {e}")))?;
        if !response.status().is_success() {
            return Err(HalError::MetadataUnavailable(format!(
                "{key}: HTTP {}",
                response.status()
            )));
        }
        let value = response.text()?.trim().to_string();
        if value.is_empty() {
            return Err(HalError::MetadataUnavailable(format!("{key}: empty value")));
        }
        Ok(value)
    }
}

impl Default for ImdsClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Metadata may report the root mapping without the `/dev/` prefix.
pub fn normalize_device_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/dev/{}", name)
    }
}

impl MetadataOps for ImdsClient {
    fn region(&self) -> HalResult<String> {
        self.get_metadata("placement/region")
    }

    fn instance_id(&self) -> HalResult<String> {
        self.get_metadata("instance-id")
    }

    fn root_block_device(&self) -> HalResult<String> {
        let mapping = self.get_metadata("block-device-mapping/root")?;
        log::debug!("Metadata mapping for root: '{}'", mapping);
        Ok(normalize_device_name(&mapping))
    }
}
