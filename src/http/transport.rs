//! Single-attempt request transport.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Instant;
use thiserror::Error;

use super::progress::Progress;
use crate::config::PROGRESS_THRESHOLD_BYTES;
use crate::method::Method;
use crate::request::OutgoingRequest;
use crate::response::Response;

/// Failure of one attempt, before any HTTP status was available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The attempt exceeded its timeout.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Connection refused, DNS failure, reset or broken body stream.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request could not be built; retrying would not help.
    #[error("invalid request: {0}")]
    Request(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Request(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let msg = error_chain(&e);
        if e.is_timeout() {
            TransportError::Timeout(msg)
        } else if e.is_builder() {
            TransportError::Request(msg)
        } else {
            TransportError::Connect(msg)
        }
    }
}

/// Sends one request and returns the complete response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// `show_progress` asks the transport to report body download progress.
    async fn send(
        &self,
        request: &OutgoingRequest,
        show_progress: bool,
    ) -> Result<Response, TransportError>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the pyfetch User-Agent.
    pub fn with_defaults() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("pyfetch/", env!("PYFETCH_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(error_chain(&e)))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(
        &self,
        request: &OutgoingRequest,
        show_progress: bool,
    ) -> Result<Response, TransportError> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .timeout(request.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let mut response = builder.send().await?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = if show_progress && request.method == Method::Get {
            let mut progress = Progress::new(
                format!("Downloading {}", request.url),
                response.content_length(),
                PROGRESS_THRESHOLD_BYTES,
                std::io::stderr(),
            );
            let mut body = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                progress.advance(chunk.len() as u64);
                body.extend_from_slice(&chunk);
            }
            progress.finish();
            body
        } else {
            response.bytes().await?.to_vec()
        };

        debug!(
            "Received {} bytes from {} in {:?}",
            body.len(),
            url,
            start.elapsed()
        );

        Ok(Response::new(status, headers, body, url, start.elapsed()))
    }
}

/// Joins an error with its sources, since reqwest hides the root cause
/// (e.g. "Connection refused") behind its top-level message.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
