use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("catalog responded with status {0}")]
    BadStatus(u16),
    #[error("catalog request failed: {0}")]
    IoFailure(String),
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch(&self, url: Option<&str>) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
}

impl HttpCatalogClient {
    pub fn new() -> Result<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect)
            .read_timeout(read)
            .build()
            .context("building HTTP client failed")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch(&self, url: Option<&str>) -> Result<String, FetchError> {
        let Some(url) = url else {
            return Ok(String::new());
        };
        // Errors are stripped of the url so the api key never reaches the logs.
        // The response (and its connection) is dropped on every return below.
        let res = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("Problem retrieving catalog data: {}", e);
            FetchError::IoFailure(e.to_string())
        })?;
        let status = res.status();
        if status != StatusCode::OK {
            warn!("Error response code: {}", status.as_u16());
            return Err(FetchError::BadStatus(status.as_u16()));
        }
        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            warn!("Reading catalog response failed: {}", e);
            FetchError::IoFailure(e.to_string())
        })?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
