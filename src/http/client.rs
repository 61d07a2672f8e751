//! HTTP client with built-in retry logic and verbose logging.

use log::{debug, info, warn};
use serde_json::Value;

use super::retry::{Delay, TokioDelay};
use super::transport::{ReqwestTransport, Transport, TransportError};
use crate::config::ClientConfig;
use crate::error::{FetchError, FetchResult};
use crate::method::Method;
use crate::request::{OutgoingRequest, Request};
use crate::response::Response;

const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "proxy-authorization", "cookie"];

/// HTTP client that retries transport failures.
///
/// A request is attempted `retries + 1` times. Each attempt is bounded by the
/// timeout, so the worst case for one call is roughly
/// `timeout * (retries + 1)` plus the delays between attempts.
///
/// HTTP error statuses are not failures; the response is returned as is.
pub struct HttpClient<T = ReqwestTransport, D = TokioDelay> {
    config: ClientConfig,
    transport: T,
    delay: D,
}

impl HttpClient {
    /// Creates a client backed by reqwest that sleeps between retries.
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::with_defaults()
            .map_err(|e| FetchError::Client(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_transport(config, transport, TokioDelay))
    }
}

impl<T: Transport, D: Delay> HttpClient<T, D> {
    pub fn with_transport(config: ClientConfig, transport: T, delay: D) -> Self {
        Self {
            config,
            transport,
            delay,
        }
    }

    pub async fn get(&self, url: &str) -> FetchResult<Response> {
        self.execute(Request::new(Method::Get, url)).await
    }

    pub async fn post(&self, url: &str, body: Option<Value>) -> FetchResult<Response> {
        self.execute(with_body(Request::new(Method::Post, url), body))
            .await
    }

    pub async fn put(&self, url: &str, body: Option<Value>) -> FetchResult<Response> {
        self.execute(with_body(Request::new(Method::Put, url), body))
            .await
    }

    pub async fn patch(&self, url: &str, body: Option<Value>) -> FetchResult<Response> {
        self.execute(with_body(Request::new(Method::Patch, url), body))
            .await
    }

    pub async fn delete(&self, url: &str) -> FetchResult<Response> {
        self.execute(Request::new(Method::Delete, url)).await
    }

    pub async fn head(&self, url: &str) -> FetchResult<Response> {
        self.execute(Request::new(Method::Head, url)).await
    }

    pub async fn options(&self, url: &str) -> FetchResult<Response> {
        self.execute(Request::new(Method::Options, url)).await
    }

    /// Validates and sends `request`, retrying transport failures.
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: Request) -> FetchResult<Response> {
        let outgoing = request.prepare(self.config.timeout())?;
        let attempts = request
            .retries
            .unwrap_or(self.config.retries())
            .saturating_add(1);
        let show_progress = self.config.show_progress() && outgoing.method == Method::Get;

        let mut last_error = None;

        for attempt in 1..=attempts {
            if self.config.verbose() {
                log_request(&outgoing, attempt, attempts);
            }

            match self.transport.send(&outgoing, show_progress).await {
                Ok(response) => {
                    if self.config.verbose() {
                        log_response(&response);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        debug!("{} {}: non-retryable error: {}", outgoing.method, outgoing.url, e);
                        return Err(FetchError::Client(format!(
                            "{} {}: {}",
                            outgoing.method, outgoing.url, e
                        )));
                    }

                    if attempt < attempts {
                        let delay = self.config.retry_delay().delay_for(attempt);
                        if self.config.verbose() {
                            warn!(
                                "Attempt {}/{} failed ({}), retrying in {}ms...",
                                attempt,
                                attempts,
                                e,
                                delay.as_millis()
                            );
                        } else {
                            debug!("Attempt {}/{} failed ({}), retrying", attempt, attempts, e);
                        }
                        self.delay.wait(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(exhausted(&outgoing, attempts, last_error))
    }
}

fn with_body(request: Request, body: Option<Value>) -> Request {
    match body {
        Some(body) => request.json(body),
        None => request,
    }
}

fn exhausted(
    request: &OutgoingRequest,
    attempts: u32,
    last_error: Option<TransportError>,
) -> FetchError {
    let url = request.url.to_string();
    match last_error {
        Some(e) if e.is_timeout() => FetchError::Timeout {
            url,
            attempts,
            timeout: request.timeout,
        },
        Some(e) => FetchError::Connection {
            url,
            attempts,
            reason: e.to_string(),
        },
        None => FetchError::Connection {
            url,
            attempts,
            reason: "no attempt was made".to_string(),
        },
    }
}

fn log_request(request: &OutgoingRequest, attempt: u32, attempts: u32) {
    info!(
        "Attempt {}/{}: {} {}",
        attempt, attempts, request.method, request.url
    );
    for (key, value) in &request.headers {
        info!("> {}: {}", key, display_value(key, value));
    }
    if let Some(body) = &request.body {
        info!("> ({} byte body)", body.len());
    }
}

fn log_response(response: &Response) {
    info!(
        "Received {} from {} in {:.3}s",
        response.status(),
        response.url(),
        response.elapsed().as_secs_f64()
    );
    for (key, value) in response.headers() {
        info!("< {}: {}", key, display_value(key, value));
    }
}

fn display_value<'a>(key: &str, value: &'a str) -> &'a str {
    if SENSITIVE_HEADERS.iter().any(|h| key.eq_ignore_ascii_case(h)) {
        "***"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http::retry::{NoDelay, RetryDelay};
    use crate::http::transport::MockTransport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const URL: &str = "https://api.example.com/items";

    fn ok_response(status: u16) -> Response {
        Response::new(
            status,
            vec![("content-type".to_string(), "application/json".to_string())],
            br#"{"ok":true}"#.to_vec(),
            URL,
            Duration::from_millis(5),
        )
    }

    fn client(transport: MockTransport, retries: u32) -> HttpClient<MockTransport, NoDelay> {
        HttpClient::with_transport(ClientConfig::new().with_retries(retries), transport, NoDelay)
    }

    #[derive(Clone, Default)]
    struct RecordingDelay(Arc<Mutex<Vec<Duration>>>);

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn test_get_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|req, progress| req.method == Method::Get && req.url.as_str() == URL && !progress)
            .returning(|_, _| Ok(ok_response(200)));

        let response = client(transport, 3).get(URL).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_always_failing_transport_makes_retries_plus_one_attempts() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(4)
            .returning(|_, _| Err(TransportError::Connect("connection refused".to_string())));

        let err = client(transport, 3).get(URL).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Connection);
        match err {
            FetchError::Connection { url, attempts, reason } => {
                assert_eq!(url, URL);
                assert_eq!(attempts, 4);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_makes_one_attempt() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _| Err(TransportError::Connect("dns lookup failed".to_string())));

        let err = client(transport, 0).get(URL).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let mut transport = MockTransport::new();
        transport.expect_send().times(3).returning(move |_, _| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TransportError::Connect("connection reset".to_string()))
            } else {
                Ok(ok_response(200))
            }
        });

        let response = client(transport, 3).get(URL).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_timeout() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(3)
            .returning(|_, _| Err(TransportError::Timeout("operation timed out".to_string())));

        let config = ClientConfig::new()
            .with_retries(2)
            .with_timeout(Duration::from_secs(7));
        let client = HttpClient::with_transport(config, transport, NoDelay);

        let err = client.get(URL).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(matches!(
            err,
            FetchError::Timeout { attempts: 3, timeout, .. } if timeout == Duration::from_secs(7)
        ));
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _| Err(TransportError::Request("builder error".to_string())));

        let err = client(transport, 3).get(URL).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert!(err.to_string().contains(URL));
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_retried() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _| Ok(ok_response(503)));

        let response = client(transport, 3).get(URL).await.unwrap();
        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_transport_call() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);

        let client = client(transport, 3);
        for url in ["", "not a url", "ftp://example.com"] {
            let err = client.get(url).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_invalid_header_makes_no_transport_call() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);

        let err = client(transport, 3)
            .execute(Request::new(Method::Get, URL).header("Bad Header", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|req, _| {
                let body: Value = serde_json::from_slice(req.body.as_deref().unwrap_or_default())
                    .unwrap_or(Value::Null);
                req.method == Method::Post
                    && req.header("content-type") == Some("application/json")
                    && body == json!({"key": "value"})
            })
            .returning(|_, _| Ok(ok_response(201)));

        let response = client(transport, 0)
            .post(URL, Some(json!({"key": "value"})))
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn test_verbs_send_matching_method() {
        for method in Method::ALL {
            let mut transport = MockTransport::new();
            transport
                .expect_send()
                .times(1)
                .withf(move |req, _| req.method == method)
                .returning(|_, _| Ok(ok_response(200)));
            let client = client(transport, 0);

            let result = match method {
                Method::Get => client.get(URL).await,
                Method::Post => client.post(URL, None).await,
                Method::Put => client.put(URL, None).await,
                Method::Patch => client.patch(URL, None).await,
                Method::Delete => client.delete(URL).await,
                Method::Head => client.head(URL).await,
                Method::Options => client.options(URL).await,
            };
            assert!(result.is_ok(), "{} failed", method);
        }
    }

    #[tokio::test]
    async fn test_request_retry_override() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(2)
            .returning(|_, _| Err(TransportError::Connect("refused".to_string())));

        let err = client(transport, 5)
            .execute(Request::new(Method::Get, URL).retries(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Connection { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn test_delay_schedule_between_attempts() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(4)
            .returning(|_, _| Err(TransportError::Connect("refused".to_string())));

        let delay = RecordingDelay::default();
        let config = ClientConfig::new()
            .with_retries(3)
            .with_retry_delay(RetryDelay::Linear(Duration::from_millis(100)));
        let client = HttpClient::with_transport(config, transport, delay.clone());

        assert!(client.get(URL).await.is_err());
        assert_eq!(
            *delay.0.lock().unwrap(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(300)
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_only_requested_for_get() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req, progress| *progress == (req.method == Method::Get))
            .times(2)
            .returning(|_, _| Ok(ok_response(200)));

        let config = ClientConfig::new().with_progress(true);
        let client = HttpClient::with_transport(config, transport, NoDelay);

        client.get(URL).await.unwrap();
        client.head(URL).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_verbose_logging_leaves_response_untouched() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(2)
            .returning({
                let calls = AtomicUsize::new(0);
                move |_, _| {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(TransportError::Connect("reset".to_string()))
                    } else {
                        Ok(ok_response(200))
                    }
                }
            });

        let config = ClientConfig::new().with_verbose(true).with_retries(1);
        let client = HttpClient::with_transport(config, transport, NoDelay);

        let response = client
            .execute(Request::new(Method::Get, URL).header("Authorization", "Bearer secret"))
            .await
            .unwrap();
        assert_eq!(response, ok_response(200));
    }

    #[test]
    fn test_display_value_masks_sensitive_headers() {
        assert_eq!(display_value("Authorization", "Bearer abc"), "***");
        assert_eq!(display_value("cookie", "a=b"), "***");
        assert_eq!(display_value("Accept", "text/html"), "text/html");
    }
}
