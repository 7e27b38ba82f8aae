//! Request command implementation.
//!
//! Signs a request and sends it, printing the response body to stdout.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use oauth1_signer::SigningTransport;
use tracing::debug;

use super::{RequestSpec, SignerArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the request command.
#[derive(Args)]
pub(crate) struct RequestArgs {
    #[command(flatten)]
    pub(crate) signer: SignerArgs,

    #[command(flatten)]
    request: RequestSpec,

    /// Extra request header as `Name: value` (repeatable).
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// HTTP timeout in seconds (default: from config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl RequestArgs {
    /// Execute the request command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.signer.load_config(self.timeout)?;
        let signer = SignerArgs::build_signer(&config)?;
        let timeout = Duration::from_secs(config.http.timeout_secs);
        debug!("Using HTTP timeout of {}s", config.http.timeout_secs);

        let headers = self
            .headers
            .iter()
            .map(String::as_str)
            .map(parse_header)
            .collect::<Result<Vec<_>, _>>()?;
        let request = self.request.build(&headers)?;
        let method = request.method().clone();
        let uri = request.uri().clone();

        let client = SigningTransport::ureq_with_timeout(signer, timeout);
        let response = client.send(request)?;

        let status = response.status();
        output.status(status, &format!("{method} {uri} -> {status}"));

        let body = response.into_body().read_to_vec()?;
        std::io::stdout().write_all(&body)?;
        Ok(())
    }
}

/// Parse a `Name: value` header argument.
fn parse_header(raw: &str) -> Result<(String, String), CliError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| CliError::Validation(format!("Header must be 'Name: value': {raw}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Validation(format!("Header name is empty: {raw}")));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}
