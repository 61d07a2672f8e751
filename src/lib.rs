//! pyfetch: a small HTTP client with retries, JSON bodies and readable output.
//!
//! ```no_run
//! # async fn demo() -> Result<(), pyfetch::FetchError> {
//! use pyfetch::{ClientConfig, HttpClient};
//! use std::time::Duration;
//!
//! let client = HttpClient::new(ClientConfig::new().with_timeout(Duration::from_secs(5)))?;
//! let response = client.get("https://httpbin.org/get").await?;
//! let body: serde_json::Value = response.json()?;
//! println!("{} {}", response.status(), body);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod method;
pub mod request;
pub mod response;

pub use config::ClientConfig;
pub use error::{ErrorKind, FetchError, FetchResult};
pub use format::format_response;
pub use http::HttpClient;
pub use method::Method;
pub use request::Request;
pub use response::Response;
