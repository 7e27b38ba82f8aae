//! CLI command implementations.

mod request;
mod sign;

pub(crate) use request::RequestArgs;
pub(crate) use sign::SignArgs;

use std::path::{Path, PathBuf};

use clap::Args;
use oauth1_config::{CliSettings, Config};
use oauth1_signer::{Signer, load_private_key_from_file, load_private_key_from_p12_file};
use tracing::debug;
use ureq::http::Request;

use crate::error::CliError;

/// Signer identity and configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct SignerArgs {
    /// Path to configuration file (default: auto-discover oauth1.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OAuth consumer key (default: from config).
    #[arg(long, env = "OAUTH1_CONSUMER_KEY")]
    consumer_key: Option<String>,

    /// Path to RSA private key file, PEM or PKCS#12 (default: from config).
    #[arg(short = 'k', long = "private-key")]
    private_key: Option<PathBuf>,

    /// Password of a PKCS#12 key file (default: from config).
    #[arg(long, env = "OAUTH1_KEY_PASSWORD", hide_env_values = true)]
    key_password: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SignerArgs {
    /// Load config with command-line overrides applied.
    fn load_config(&self, timeout_secs: Option<u64>) -> Result<Config, CliError> {
        let settings = CliSettings {
            consumer_key: self.consumer_key.clone(),
            private_key: self.private_key.clone(),
            key_password: self.key_password.clone(),
            timeout_secs,
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }

    /// Build a signer from the resolved configuration.
    fn build_signer(config: &Config) -> Result<Signer, CliError> {
        let signer_config = config.require_signer()?;
        debug!(
            "Loading private key from {}",
            signer_config.private_key.display()
        );
        let private_key = if signer_config.is_pkcs12() {
            let password = signer_config.key_password.as_deref().unwrap_or_default();
            load_private_key_from_p12_file(&signer_config.private_key, password)?
        } else {
            load_private_key_from_file(&signer_config.private_key)?
        };
        Ok(Signer::new(&signer_config.consumer_key, private_key)?)
    }
}

/// Request description shared by all commands.
#[derive(Args)]
pub(crate) struct RequestSpec {
    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Absolute request URL, query included.
    #[arg(short, long)]
    url: String,

    /// File whose contents form the request body.
    #[arg(short, long)]
    body: Option<PathBuf>,
}

impl RequestSpec {
    /// Build the request, reading the body file if given.
    fn build(&self, headers: &[(String, String)]) -> Result<Request<Vec<u8>>, CliError> {
        let body = read_body(self.body.as_deref())?;
        let mut builder = Request::builder()
            .method(self.method.to_uppercase().as_str())
            .uri(self.url.as_str());
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        Ok(builder.body(body)?)
    }
}

/// Read the request body; no file means an empty body.
fn read_body(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => Ok(std::fs::read(path)?),
        None => Ok(Vec::new()),
    }
}
