use clap::Parser;
use pyfetch::commands::{self, Cli};
use pyfetch::error::{EXIT_CLIENT_ERROR, EXIT_INTERRUPTED};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "warn,pyfetch=info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let code = match commands::interruptible(commands::run_cli(cli), commands::ctrl_c()).await {
        Some(Ok(code)) => code,
        Some(Err(e)) => {
            eprintln!("Error: {:#}", e);
            EXIT_CLIENT_ERROR
        }
        None => {
            eprintln!("\nRequest interrupted by user");
            EXIT_INTERRUPTED
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
