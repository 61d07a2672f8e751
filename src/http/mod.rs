//! HTTP client module with retry logic, transport and progress reporting.

mod client;
mod progress;
mod retry;
mod transport;

pub use client::HttpClient;
pub use progress::Progress;
pub use retry::{Delay, NoDelay, RetryDelay, TokioDelay};
pub use transport::{ReqwestTransport, Transport, TransportError};

#[cfg(test)]
pub(crate) use transport::MockTransport;
