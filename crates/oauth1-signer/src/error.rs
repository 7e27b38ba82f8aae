//! Error types for request signing.

use std::path::PathBuf;
use std::str::Utf8Error;

use ureq::http::header::InvalidHeaderValue;

/// Error while computing or attaching an OAuth signature.
///
/// Variants fall into three groups: configuration errors (fix the setup, never
/// retry), body read errors (transient), and cryptographic failures (a bad key
/// fails the same way every time).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignError {
    /// Consumer key was not provided or is empty.
    #[error("signer: provide a valid consumer key")]
    MissingConsumerKey,

    /// Signing key was not provided.
    #[error("signer: provide a valid signing key")]
    MissingSigningKey,

    /// Signing key failed RSA consistency checks.
    #[error("signer: invalid signing key")]
    InvalidSigningKey(#[source] rsa::Error),

    /// Request URI lacks a scheme or host.
    #[error("request URI must be absolute: {0}")]
    RelativeUri(String),

    /// Computed header contains bytes not allowed in an HTTP header value.
    #[error("invalid Authorization header value")]
    HeaderValue(#[from] InvalidHeaderValue),

    /// Request body could not be re-read.
    #[error("failed to read request body")]
    Body(#[source] std::io::Error),

    /// RSA signing operation failed.
    #[error("RSA-SHA256 signing failed")]
    Crypto(#[source] rsa::signature::Error),

    /// Clock reads earlier than the UNIX epoch, so no timestamp can be sent.
    #[error("system clock is set before the UNIX epoch")]
    Clock(#[source] std::time::SystemTimeError),
}

impl SignError {
    /// Whether the error stems from signer or request setup.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingConsumerKey
                | Self::MissingSigningKey
                | Self::InvalidSigningKey(_)
                | Self::RelativeUri(_)
                | Self::HeaderValue(_)
        )
    }

    /// Whether retrying the same request could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Body(_))
    }
}

/// RSA key loading/parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KeyError {
    /// Key file could not be read.
    #[error("failed to read key file {}", .path.display())]
    Io {
        /// Path of the key file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid UTF-8 in key.
    #[error("invalid UTF-8 in key")]
    InvalidUtf8(#[from] Utf8Error),

    /// PKCS#1 key parsing error (returned when both formats fail).
    #[error("PKCS#1 key error")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// Key inside a PKCS#12 container is not an RSA PKCS#8 key.
    #[error("PKCS#8 key error")]
    Pkcs8(#[from] rsa::pkcs8::Error),

    /// PKCS#12 container could not be parsed or decrypted.
    #[error("invalid PKCS#12 container")]
    Pkcs12(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// PKCS#12 integrity check failed, usually a wrong password.
    #[error("PKCS#12 password is incorrect")]
    Pkcs12Password,

    /// PKCS#12 container holds no private key.
    #[error("PKCS#12 container holds no private key")]
    Pkcs12NoKey,
}

/// Error from a [`SigningTransport`](crate::SigningTransport) round trip.
#[derive(Debug, thiserror::Error)]
pub enum InterceptError {
    /// Signing key could not be loaded.
    #[error("signing key could not be loaded")]
    Key(#[from] KeyError),

    /// Request was not sent because signing failed.
    #[error("request signing failed")]
    Sign(#[from] SignError),

    /// Signed request failed in the underlying transport.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
