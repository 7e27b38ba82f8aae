//! OAuth1 CLI - OAuth 1.0a RSA-SHA256 request signer.
//!
//! Provides commands for:
//! - `sign`: Print the `Authorization` header for a request
//! - `request`: Sign a request and send it

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RequestArgs, SignArgs};
use output::Output;

/// OAuth1 - OAuth 1.0a request signer with body hash.
#[derive(Parser)]
#[command(name = "oauth1", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Authorization header for a request.
    Sign(SignArgs),
    /// Sign a request and send it.
    Request(RequestArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Sign(args) => args.signer.verbose,
        Commands::Request(args) => args.signer.verbose,
    };

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sign(args) => args.execute(),
        Commands::Request(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
