//! External job sources.
//!
//! A source only fetches; checking the payload shape is the pipeline's job,
//! so every source returns the decoded body as-is.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use jobfeed_core::config::SourceConfig;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the raw payload.
    async fn fetch(&self) -> Result<Value, FetchError>;

    /// Human-readable label for logs.
    fn describe(&self) -> String;
}

/// Source backed by an HTTP `GET` to a fixed URL.
pub struct HttpJobSource {
    client: Client,
    url: String,
}

impl HttpJobSource {
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "source responded");
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Source that replays a payload saved to disk.
pub struct FileJobSource {
    path: PathBuf,
}

impl FileJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JobSource for FileJobSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
