use clap::Parser;
use log::warn;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS};
use crate::error::{FetchError, FetchResult};
use crate::http::RetryDelay;
use crate::method::Method;
use crate::request::{Request, parse_header, parse_json_body};

/// pyfetch - a small HTTP client for the command line
///
/// Sends GET, POST, PUT, PATCH, DELETE, HEAD and OPTIONS requests and prints
/// the status, headers and body. JSON bodies are pretty-printed.
///
/// Run `pyfetch HELP` for examples.
#[derive(Parser, Debug)]
#[command(name = "pyfetch", author, version = env!("PYFETCH_VERSION"), about)]
pub struct Cli {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS) or HELP, any casing
    #[arg(value_name = "METHOD")]
    pub command: Option<String>,

    /// Target URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(
        short = 't',
        long,
        env = "PYFETCH_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Number of retries after a failed connection attempt
    #[arg(
        short = 'r',
        long,
        env = "PYFETCH_RETRIES",
        value_name = "COUNT",
        default_value_t = DEFAULT_RETRIES
    )]
    pub retries: u32,

    /// Delay between attempts in milliseconds
    #[arg(long = "retry-delay", value_name = "MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// HTTP header in 'Key: Value' format; may be repeated
    #[arg(short = 'H', long = "header", value_name = "KEY: VALUE")]
    pub headers: Vec<String>,

    /// JSON request body (POST, PUT and PATCH only), e.g. '{"key": "value"}'
    #[arg(short = 'd', long = "data", value_name = "JSON")]
    pub data: Option<String>,

    /// Log request and response details to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Show download progress for GET responses larger than 5 MiB
    #[arg(long)]
    pub progress: bool,
}

/// The first positional argument, resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Send(Method),
}

impl FromStr for Command {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("help") {
            return Ok(Command::Help);
        }
        s.parse::<Method>().map(Command::Send).map_err(|_| {
            FetchError::validation(format!(
                "Unknown command '{}'. Expected one of: {}, HELP",
                s,
                Method::ALL.map(|m| m.as_str()).join(", ")
            ))
        })
    }
}

/// What an invocation asks for, after local validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Help,
    Send {
        config: ClientConfig,
        request: Request,
    },
}

impl Cli {
    /// Validates the arguments without touching the network.
    ///
    /// Every `--header` must be `Key: Value` and `--data` must be JSON;
    /// one bad value rejects the whole invocation.
    pub fn resolve(&self) -> FetchResult<Action> {
        let method = match self.command.as_deref() {
            None => return Ok(Action::Help),
            Some(raw) => match raw.parse::<Command>()? {
                Command::Help => return Ok(Action::Help),
                Command::Send(method) => method,
            },
        };

        let url = self
            .url
            .as_deref()
            .ok_or_else(|| FetchError::validation(format!("{} requires a URL", method)))?;

        let headers = self
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<FetchResult<Vec<_>>>()?;

        let mut request = Request::new(method, url).headers(headers);

        if let Some(data) = &self.data {
            if !method.accepts_body() {
                return Err(FetchError::validation(format!(
                    "--data is not accepted for {}; use POST, PUT or PATCH",
                    method
                )));
            }
            request = request.json(parse_json_body(data)?);
        }

        if self.progress && method != Method::Get {
            warn!("--progress only applies to GET requests; ignoring it for {}", method);
        }

        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retries(self.retries)
            .with_verbose(self.verbose)
            .with_progress(self.progress && method == Method::Get)
            .with_retry_delay(RetryDelay::Fixed(Duration::from_millis(self.retry_delay_ms)));

        Ok(Action::Send { config, request })
    }
}
