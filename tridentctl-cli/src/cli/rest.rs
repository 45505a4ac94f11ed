//! Minimal REST client for direct mode

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn ensure_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            Err(anyhow::anyhow!("Server error {}: {}", status, body.trim()))
        }
    }

    /// GET `path` below the base URL and decode the JSON body
    pub fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Could not reach Trident at {}", url))?;

        Self::ensure_success(response)?
            .json()
            .with_context(|| format!("Could not decode response from {}", url))
    }
}
