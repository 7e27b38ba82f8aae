//! Signing wrapper around an HTTP transport.
//!
//! [`SigningTransport`] signs every request before handing it to the inner
//! transport. A request whose signing fails is never sent.

use std::path::Path;
use std::time::Duration;

use tracing::debug;
use ureq::http::{Request, Response};
use ureq::{Agent, AsSendBody, Body};

use crate::body::RequestBody;
use crate::error::InterceptError;
use crate::key::{load_private_key_from_file, load_private_key_from_p12_file};
use crate::signer::Signer;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Sends a request and returns the response.
pub trait Transport<B> {
    /// Response type.
    type Response;
    /// Transport failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform the round trip.
    fn round_trip(&self, request: Request<B>) -> Result<Self::Response, Self::Error>;
}

impl<B: AsSendBody> Transport<B> for Agent {
    type Response = Response<Body>;
    type Error = ureq::Error;

    fn round_trip(&self, request: Request<B>) -> Result<Self::Response, Self::Error> {
        self.run(request)
    }
}

/// Transport that attaches an OAuth `Authorization` header to each request.
#[derive(Debug)]
pub struct SigningTransport<T> {
    inner: T,
    signer: Signer,
}

impl<T> SigningTransport<T> {
    /// Wrap a transport.
    pub fn new(inner: T, signer: Signer) -> Self {
        Self { inner, signer }
    }

    /// Signer used for every request.
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Sign the request, then send it through the inner transport.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::Sign`] without sending anything if signing
    /// fails, and [`InterceptError::Transport`] if the round trip fails.
    pub fn send<B>(&self, mut request: Request<B>) -> Result<T::Response, InterceptError>
    where
        T: Transport<B>,
        B: RequestBody,
    {
        self.signer.sign(&mut request)?;
        debug!("Sending signed {} {}", request.method(), request.uri());
        self.inner
            .round_trip(request)
            .map_err(|e| InterceptError::Transport(Box::new(e)))
    }
}

impl SigningTransport<Agent> {
    /// Wrap a new ureq agent with the default timeout.
    pub fn ureq(signer: Signer) -> Self {
        Self::ureq_with_timeout(signer, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Wrap a new ureq agent with the given global timeout.
    ///
    /// HTTP error statuses are returned as responses, not errors.
    pub fn ureq_with_timeout(signer: Signer, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self::new(agent, signer)
    }

    /// Load a PEM signing key and return a ready-to-use signing client.
    ///
    /// # Arguments
    /// * `consumer_key` - OAuth consumer key
    /// * `key_file` - Path to RSA private key file (PEM format)
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be loaded or the signer identity is
    /// incomplete.
    pub fn from_pem_file(consumer_key: &str, key_file: &Path) -> Result<Self, InterceptError> {
        let private_key = load_private_key_from_file(key_file)?;
        let signer = Signer::new(consumer_key, private_key)?;
        Ok(Self::ureq(signer))
    }

    /// Load a signing key from a PKCS#12 container and return a ready-to-use
    /// signing client.
    ///
    /// # Arguments
    /// * `consumer_key` - OAuth consumer key
    /// * `key_file` - Path to the PKCS#12 file (`.p12`/`.pfx`)
    /// * `password` - Container password
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be opened with `password` or
    /// the signer identity is incomplete.
    pub fn from_p12_file(
        consumer_key: &str,
        key_file: &Path,
        password: &str,
    ) -> Result<Self, InterceptError> {
        let private_key = load_private_key_from_p12_file(key_file, password)?;
        let signer = Signer::new(consumer_key, private_key)?;
        Ok(Self::ureq(signer))
    }
}
