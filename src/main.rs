//! AVVO Reviews CLI - print a lawyer's AVVO reviews
//!
//! Fetches reviews through the cached API client and writes them to stdout as
//! text or JSON. Failed fetches print nothing; the cause is logged to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use avvo_reviews::cli::{format_reviews, Cli};

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `-v` level
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = cli.build_client()?;

    let reviews = client.get_reviews(cli.lawyer_id).await;
    let output = format_reviews(&reviews, cli.format)?;
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }

    Ok(())
}
