//! HTTP transport used by the API client.
//!
//! The client only needs "GET this URL with these query parameters and give
//! me the status and body", so that is the whole trait. Tests substitute a
//! scripted implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised below the HTTP status level
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single GET; no retries
    async fn get(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<HttpReply, TransportError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(HttpReply { status, body })
    }
}
