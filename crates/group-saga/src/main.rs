mod commands;
mod error;
mod hosts;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use cluster_http::DEFAULT_TIMEOUT;
use cluster_saga::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, RetryPolicy};
use tracing::Level;

use crate::commands::{CommandContext, Commands};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "group-saga")]
#[command(bin_name = "group-saga")]
#[command(about = "Create and delete groups across a cluster of hosts", long_about = None)]
struct Cli {
    /// Comma-separated host base URLs (default: $HOSTS, then three local hosts)
    #[arg(long, global = true, value_name = "LIST")]
    hosts: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Attempts per host operation before giving up on the host
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Retry immediately instead of backing off exponentially
    #[arg(long, global = true)]
    no_backoff: bool,

    /// More logging (-v debug, -vv trace); also prints the per-host audit
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn retry_policy(&self) -> RetryPolicy {
        if self.no_backoff {
            RetryPolicy::immediate(self.max_attempts)
        } else {
            RetryPolicy::new(self.max_attempts, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY)
        }
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level().into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        hosts: hosts::resolve_hosts(cli.hosts.as_deref()),
        timeout: Duration::from_secs(cli.timeout_secs),
        policy: cli.retry_policy(),
        show_audit: cli.verbose > 0,
    };

    match cli.command.execute(&ctx).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
