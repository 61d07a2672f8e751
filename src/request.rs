//! Request description and local validation.
//!
//! Everything in this module runs before the transport is touched: a
//! [`Request`] that fails [`Request::prepare`] never reaches the network.

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::method::Method;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// A request as the caller describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Overrides the client's timeout for this request only.
    pub timeout: Option<Duration>,
    /// Overrides the client's retry count for this request only.
    pub retries: Option<u32>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            retries: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Validates the request and produces the wire-ready form.
    ///
    /// `default_timeout` is used when the request carries no override.
    pub fn prepare(&self, default_timeout: Duration) -> FetchResult<OutgoingRequest> {
        let url = validate_url(&self.url)?;

        let timeout = self.timeout.unwrap_or(default_timeout);
        if timeout.is_zero() {
            return Err(FetchError::validation("Timeout must be a positive number of seconds"));
        }

        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        for (key, value) in &self.headers {
            validate_header(key, value)?;
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }

        let body = match &self.body {
            Some(value) => {
                if !self.method.accepts_body() {
                    return Err(FetchError::validation(format!(
                        "{} requests do not accept a body; use POST, PUT or PATCH",
                        self.method
                    )));
                }
                let encoded = serde_json::to_vec(value)
                    .map_err(|e| FetchError::validation(format!("Failed to encode JSON body: {}", e)))?;
                if !has_header(&headers, CONTENT_TYPE) {
                    headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
                }
                Some(encoded)
            }
            None => None,
        };

        Ok(OutgoingRequest {
            method: self.method,
            url,
            headers,
            body,
            timeout,
        })
    }
}

/// A validated request, ready for a [`crate::http::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl OutgoingRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Parses and checks a URL; only absolute http(s) URLs with a host are accepted.
pub fn validate_url(raw: &str) -> FetchResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::validation("URL must not be empty"));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| FetchError::validation(format!("Malformed URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FetchError::validation(format!(
                "Unsupported URL scheme '{}' in '{}'; expected http or https",
                other, raw
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::validation(format!("URL '{}' has no host", raw)));
    }

    Ok(url)
}

/// Parses a `Key: Value` header argument. The value may itself contain colons.
pub fn parse_header(raw: &str) -> FetchResult<(String, String)> {
    let (key, value) = raw.split_once(':').ok_or_else(|| {
        FetchError::validation(format!(
            "Invalid header '{}'. Expected format 'Key: Value'",
            raw
        ))
    })?;

    let key = key.trim();
    let value = value.trim();
    validate_header(key, value)?;

    Ok((key.to_string(), value.to_string()))
}

/// Parses a JSON request body supplied as text.
pub fn parse_json_body(raw: &str) -> FetchResult<Value> {
    serde_json::from_str(raw).map_err(|e| {
        FetchError::validation(format!(
            "Invalid JSON data ({}). Example: '{{\"key\": \"value\"}}'",
            e
        ))
    })
}

fn validate_header(key: &str, value: &str) -> FetchResult<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(FetchError::validation("Header name must not be empty"));
    }
    HeaderName::from_bytes(key.as_bytes())
        .map_err(|_| FetchError::validation(format!("Invalid header name '{}'", key)))?;
    HeaderValue::from_str(value.trim())
        .map_err(|_| FetchError::validation(format!("Invalid value for header '{}'", key)))?;
    Ok(())
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    find_header(headers, name).is_some()
}
