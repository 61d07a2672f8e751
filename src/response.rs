//! HTTP response as returned to callers.

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::request::find_header;

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    url: String,
    elapsed: Duration,
}

impl Response {
    pub fn new(
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
        url: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url: url.into(),
            elapsed,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers in the order the server sent them.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8; invalid sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wall time from sending the request to receiving the last body byte.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> FetchResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| FetchError::Decode(format!("{} (from {})", e, self.url)))
    }

    /// Turns a non-2xx response into [`FetchError::Response`].
    ///
    /// The client never does this on its own; it is for callers that want
    /// HTTP failures as errors.
    pub fn error_for_status(self) -> FetchResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Response {
                status: self.status,
                url: self.url,
            })
        }
    }
}
