//! Command dispatch: validate arguments, send the request, print the result.

mod cli;
mod help;

pub use cli::{Action, Cli, Command};
pub use help::EXAMPLES;

use anyhow::{Context, Result};
use clap::CommandFactory;
use log::debug;
use std::future::Future;
use std::io::Write;

use crate::error::{EXIT_SUCCESS, FetchError};
use crate::format::format_response;
use crate::http::{Delay, HttpClient, ReqwestTransport, TokioDelay, Transport};

/// Runs one invocation against the real network, printing to stdout/stderr.
pub async fn run_cli(cli: Cli) -> Result<i32> {
    let transport = ReqwestTransport::with_defaults().context("Failed to create HTTP client")?;
    run(
        &cli,
        transport,
        TokioDelay,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

/// Parses and executes one invocation and returns the process exit code.
///
/// Request failures are printed to `err` and mapped to an exit code; only
/// failures to write output are returned as `Err`.
#[tracing::instrument(skip_all)]
pub async fn run<T, D, O, E>(
    cli: &Cli,
    transport: T,
    delay: D,
    out: &mut O,
    err: &mut E,
) -> Result<i32>
where
    T: Transport,
    D: Delay,
    O: Write,
    E: Write,
{
    let action = match cli.resolve() {
        Ok(action) => action,
        Err(e) => {
            debug!("Rejected invocation: {}", e);
            writeln!(
                err,
                "Error: {}\n\n{}\nRun 'pyfetch HELP' for examples.",
                e,
                Cli::command().render_usage()
            )?;
            return Ok(e.exit_code());
        }
    };

    match action {
        Action::Help => {
            writeln!(out, "{}\n\n{}", Cli::command().render_long_help(), EXAMPLES)
                .context("Failed to write help")?;
            Ok(EXIT_SUCCESS)
        }
        Action::Send { config, request } => {
            let client = HttpClient::with_transport(config, transport, delay);
            match client.execute(request).await {
                Ok(response) => {
                    out.write_all(format_response(&response).as_bytes())
                        .and_then(|_| out.flush())
                        .context("Failed to write response")?;
                    Ok(EXIT_SUCCESS)
                }
                Err(e) => report(err, &e),
            }
        }
    }
}

fn report<E: Write>(err: &mut E, e: &FetchError) -> Result<i32> {
    writeln!(err, "Error: {}", e)?;
    Ok(e.exit_code())
}

/// Runs `task` until it completes or `interrupt` fires; `None` means interrupted.
///
/// Dropping `task` aborts the in-flight attempt and any remaining retries.
pub async fn interruptible<F, S>(task: F, interrupt: S) -> Option<F::Output>
where
    F: Future,
    S: Future,
{
    tokio::select! {
        output = task => Some(output),
        _ = interrupt => None,
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
