//! Error taxonomy for request validation, transport failures and response handling.

use std::time::Duration;
use thiserror::Error;

/// Exit code for a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for generic client errors.
pub const EXIT_CLIENT_ERROR: i32 = 1;
/// Exit code for usage and local validation errors.
pub const EXIT_USAGE: i32 = 2;
/// Exit code when the server could not be reached after all retries.
pub const EXIT_CONNECTION: i32 = 3;
/// Exit code when every attempt timed out.
pub const EXIT_TIMEOUT: i32 = 4;
/// Exit code after Ctrl-C (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Errors returned by [`crate::HttpClient`] and the request builders.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Input rejected locally, before any network I/O.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The server could not be reached after every attempt.
    #[error("Failed to connect to {url} after {attempts} attempt(s): {reason}")]
    Connection {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// Every attempt exceeded the configured timeout.
    #[error("Request to {url} timed out after {timeout:?} ({attempts} attempt(s))")]
    Timeout {
        url: String,
        attempts: u32,
        timeout: Duration,
    },

    /// The request could not be constructed or sent for a non-network reason.
    #[error("Request failed: {0}")]
    Client(String),

    /// Non-2xx status, only produced by [`crate::Response::error_for_status`].
    #[error("HTTP error {status} from {url}")]
    Response { status: u16, url: String },

    /// The response body could not be decoded as the requested JSON type.
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

/// Broad category of a [`FetchError`], for branching without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Connection,
    Timeout,
    Client,
    Response,
    Decode,
}

impl FetchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FetchError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Validation(_) => ErrorKind::Validation,
            FetchError::Connection { .. } => ErrorKind::Connection,
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::Client(_) => ErrorKind::Client,
            FetchError::Decode(_) => ErrorKind::Decode,
            FetchError::Response { .. } => ErrorKind::Response,
        }
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Validation => EXIT_USAGE,
            ErrorKind::Connection => EXIT_CONNECTION,
            ErrorKind::Timeout => EXIT_TIMEOUT,
            ErrorKind::Client | ErrorKind::Response | ErrorKind::Decode => EXIT_CLIENT_ERROR,
        }
    }
}

/// Result alias used across the library.
pub type FetchResult<T> = Result<T, FetchError>;
