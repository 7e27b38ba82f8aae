//! Sign command implementation.
//!
//! Prints the `Authorization` header value for a request without sending it.

use std::io::Write;

use clap::Args;
use oauth1_signer::AUTHORIZATION_HEADER;
use tracing::debug;

use super::{RequestSpec, SignerArgs};
use crate::error::CliError;

/// Arguments for the sign command.
#[derive(Args)]
pub(crate) struct SignArgs {
    #[command(flatten)]
    pub(crate) signer: SignerArgs,

    #[command(flatten)]
    request: RequestSpec,

    /// Print the full `Authorization: ...` line instead of the value only.
    #[arg(long)]
    full: bool,
}

impl SignArgs {
    /// Execute the sign command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let line = self.header_line()?;
        writeln!(std::io::stdout(), "{line}")?;
        Ok(())
    }

    /// Sign the described request and format the header for output.
    fn header_line(&self) -> Result<String, CliError> {
        let config = self.signer.load_config(None)?;
        let signer = SignerArgs::build_signer(&config)?;

        let mut request = self.request.build(&[])?;
        signer.sign(&mut request)?;
        debug!("Signed {} {}", request.method(), request.uri());

        let value = request
            .headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CliError::Validation("signer produced no header".to_owned()))?;

        if self.full {
            Ok(format!("{AUTHORIZATION_HEADER}: {value}"))
        } else {
            Ok(value.to_owned())
        }
    }
}
