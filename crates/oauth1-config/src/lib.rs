//! Configuration management for the OAuth 1.0a signer.
//!
//! Parses `oauth1.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `signer.consumer_key`
//! - `signer.private_key`
//! - `signer.key_password`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override OAuth consumer key.
    pub consumer_key: Option<String>,
    /// Override private key path.
    pub private_key: Option<PathBuf>,
    /// Override PKCS#12 container password.
    pub key_password: Option<String>,
    /// Override HTTP timeout.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "oauth1.toml";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Signer configuration (paths are relative strings from TOML).
    signer: SignerConfigRaw,
    /// HTTP client configuration.
    pub http: HttpConfig,

    /// Resolved signer configuration (set after loading).
    #[serde(skip)]
    pub signer_resolved: SignerConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw signer configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SignerConfigRaw {
    consumer_key: Option<String>,
    private_key: Option<String>,
    key_password: Option<String>,
}

/// Resolved signer configuration with absolute key path.
#[derive(Debug, Default)]
pub struct SignerConfig {
    /// OAuth consumer key.
    pub consumer_key: String,
    /// Path to the RSA private key (PEM, or PKCS#12 for `.p12`/`.pfx`).
    pub private_key: PathBuf,
    /// Password of a PKCS#12 container.
    pub key_password: Option<String>,
}

impl SignerConfig {
    /// Whether the key file is a PKCS#12 container, judged by extension.
    pub fn is_pkcs12(&self) -> bool {
        self.private_key
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("p12") || ext.eq_ignore_ascii_case("pfx"))
    }
}

impl SignerConfig {
    /// Validate that both parts of the signer identity are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if either field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.consumer_key, "signer.consumer_key")?;
        if self.private_key.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "signer.private_key cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// HTTP client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`signer.consumer_key`").
        field: String,
        /// Error message (e.g., "${`OAUTH1_CONSUMER_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `oauth1.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(consumer_key) = &settings.consumer_key {
            self.signer_resolved.consumer_key.clone_from(consumer_key);
        }
        if let Some(private_key) = &settings.private_key {
            self.signer_resolved.private_key.clone_from(private_key);
        }
        if let Some(key_password) = &settings.key_password {
            self.signer_resolved.key_password = Some(key_password.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.http.timeout_secs = timeout_secs;
        }
    }

    /// Get validated signer configuration.
    ///
    /// Use this instead of accessing `signer_resolved` directly when the
    /// command needs to sign requests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the consumer key or key path is missing.
    pub fn require_signer(&self) -> Result<&SignerConfig, ConfigError> {
        self.signer_resolved.validate()?;
        Ok(&self.signer_resolved)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Signer fields are checked by [`Config::require_signer`], since commands
    /// may supply them on the command line instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_TIMEOUT_SECS: u64 = 3600;

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.http.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "http.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref key) = self.signer.consumer_key {
            self.signer.consumer_key = Some(expand::expand_env(key, "signer.consumer_key")?);
        }
        if let Some(ref path) = self.signer.private_key {
            self.signer.private_key = Some(expand::expand_env(path, "signer.private_key")?);
        }
        if let Some(ref password) = self.signer.key_password {
            self.signer.key_password = Some(expand::expand_env(password, "signer.key_password")?);
        }
        Ok(())
    }

    /// Resolve the key path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.signer_resolved = SignerConfig {
            consumer_key: self.signer.consumer_key.clone().unwrap_or_default(),
            private_key: self
                .signer
                .private_key
                .as_deref()
                .map(|p| config_dir.join(p))
                .unwrap_or_default(),
            key_password: self.signer.key_password.clone(),
        };
    }
}
