//! Request signer holding the consumer key and RSA signing key.

use std::fmt;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use rand::RngExt;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use sha2::Sha256;
use tracing::{debug, warn};
use ureq::http::header::{AUTHORIZATION, HeaderValue};
use ureq::http::{Request, Uri};

use crate::base_url::base_url;
use crate::body::RequestBody;
use crate::encode::percent_encode;
use crate::error::SignError;
use crate::params::{
    BODY_HASH_PARAM, CONSUMER_KEY_PARAM, NONCE_PARAM, OAuthParams, SIGNATURE_METHOD_PARAM,
    SIGNATURE_PARAM, TIMESTAMP_PARAM, VERSION_PARAM, canonical_parameter_string,
};
use crate::query::extract_query_params;
use crate::signature::{
    authorization_header_value, body_hash, sign_base_string, signature_base_string,
};
use crate::{OAUTH_VERSION, SIGNATURE_METHOD};

/// Nonce length in characters.
const NONCE_LENGTH: usize = 16;

/// Nonce alphabet: digits, upper and lower case letters.
const NONCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Source of `oauth_timestamp` values.
pub trait Clock: Send + Sync {
    /// Seconds since the UNIX epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock reads earlier than the epoch.
    fn unix_timestamp(&self) -> Result<u64, SystemTimeError>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> Result<u64, SystemTimeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
    }
}

/// Source of `oauth_nonce` values.
pub trait NonceSource: Send + Sync {
    /// Produce a nonce unique to one request.
    fn nonce(&self) -> String;
}

/// 16 alphanumeric characters from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn nonce(&self) -> String {
        let mut rng = rand::rng();
        (0..NONCE_LENGTH)
            .map(|_| char::from(NONCE_ALPHABET[rng.random_range(0..NONCE_ALPHABET.len())]))
            .collect()
    }
}

/// Signs outgoing requests with OAuth 1.0a RSA-SHA256.
///
/// Holds no mutable state, so one instance can sign requests from many
/// threads at once.
pub struct Signer {
    consumer_key: String,
    signing_key: SigningKey<Sha256>,
    clock: Box<dyn Clock>,
    nonces: Box<dyn NonceSource>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Create a signer with the system clock and random nonces.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the consumer key is empty or the key
    /// fails validation.
    pub fn new(consumer_key: &str, signing_key: RsaPrivateKey) -> Result<Self, SignError> {
        Self::builder()
            .consumer_key(consumer_key)
            .signing_key(signing_key)
            .build()
    }

    /// Start building a signer.
    pub fn builder() -> SignerBuilder {
        SignerBuilder::default()
    }

    /// Consumer key sent as `oauth_consumer_key`.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Sign a request in place by setting its `Authorization` header.
    ///
    /// The body is replayed for hashing and left untouched. On error the
    /// request is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Body`] if the body cannot be re-read, and the
    /// errors of [`Signer::authorization_header`].
    pub fn sign<B: RequestBody>(&self, request: &mut Request<B>) -> Result<(), SignError> {
        let header = {
            let payload = request.body().replay().map_err(SignError::Body)?;
            self.authorization_header(request.method().as_str(), request.uri(), &payload)?
        };
        let value = HeaderValue::from_str(&header)?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Compute the `Authorization` header value for a request.
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `uri` - Absolute request URI, query included
    /// * `payload` - Request body bytes, empty for bodiless requests
    ///
    /// # Errors
    ///
    /// Returns [`SignError::RelativeUri`] for a URI without scheme or host,
    /// [`SignError::Crypto`] if RSA signing fails, and [`SignError::Clock`] if
    /// the clock reads before the UNIX epoch.
    pub fn authorization_header(
        &self,
        method: &str,
        uri: &Uri,
        payload: &[u8],
    ) -> Result<String, SignError> {
        let base_url = base_url(uri)?;
        let query_params = extract_query_params(uri);
        let mut oauth_params = self.oauth_params(payload)?;

        let param_string = canonical_parameter_string(&query_params, &oauth_params);
        let base_string = signature_base_string(method, &base_url, &param_string);
        debug!(
            "Signing {} {} ({} query parameters, {} body bytes)",
            method,
            base_url,
            query_params.len(),
            payload.len()
        );

        let signature = sign_base_string(&base_string, &self.signing_key)?;
        oauth_params.insert(SIGNATURE_PARAM.to_owned(), percent_encode(signature));

        Ok(authorization_header_value(&oauth_params))
    }

    /// Fresh OAuth protocol parameters for one request, without signature.
    fn oauth_params(&self, payload: &[u8]) -> Result<OAuthParams, SignError> {
        let timestamp = self.clock.unix_timestamp().map_err(|e| {
            warn!("Refusing to sign: system clock is before the UNIX epoch");
            SignError::Clock(e)
        })?;

        let mut params = OAuthParams::new();
        params.insert(CONSUMER_KEY_PARAM.to_owned(), self.consumer_key.clone());
        params.insert(NONCE_PARAM.to_owned(), self.nonces.nonce());
        params.insert(SIGNATURE_METHOD_PARAM.to_owned(), SIGNATURE_METHOD.to_owned());
        params.insert(TIMESTAMP_PARAM.to_owned(), timestamp.to_string());
        params.insert(VERSION_PARAM.to_owned(), OAUTH_VERSION.to_owned());
        params.insert(BODY_HASH_PARAM.to_owned(), body_hash(payload));
        Ok(params)
    }
}

/// Builder for [`Signer`].
#[derive(Default)]
pub struct SignerBuilder {
    consumer_key: Option<String>,
    signing_key: Option<RsaPrivateKey>,
    clock: Option<Box<dyn Clock>>,
    nonces: Option<Box<dyn NonceSource>>,
}

impl SignerBuilder {
    /// Set the consumer key.
    #[must_use]
    pub fn consumer_key(mut self, consumer_key: impl Into<String>) -> Self {
        self.consumer_key = Some(consumer_key.into());
        self
    }

    /// Set the RSA private key.
    #[must_use]
    pub fn signing_key(mut self, signing_key: RsaPrivateKey) -> Self {
        self.signing_key = Some(signing_key);
        self
    }

    /// Replace the system clock.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Replace the random nonce source.
    #[must_use]
    pub fn nonce_source(mut self, nonces: impl NonceSource + 'static) -> Self {
        self.nonces = Some(Box::new(nonces));
        self
    }

    /// Build the signer.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingConsumerKey`] or
    /// [`SignError::MissingSigningKey`] when either part of the identity is
    /// absent, and [`SignError::InvalidSigningKey`] when the key fails RSA
    /// consistency checks.
    pub fn build(self) -> Result<Signer, SignError> {
        let consumer_key = self
            .consumer_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                warn!("Signer rejected: consumer key is missing");
                SignError::MissingConsumerKey
            })?;
        let signing_key = self.signing_key.ok_or_else(|| {
            warn!("Signer rejected: signing key is missing");
            SignError::MissingSigningKey
        })?;
        signing_key.validate().map_err(|e| {
            warn!("Signer rejected: signing key failed validation: {e}");
            SignError::InvalidSigningKey(e)
        })?;

        Ok(Signer {
            consumer_key,
            signing_key: SigningKey::<Sha256>::new(signing_key),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            nonces: self.nonces.unwrap_or_else(|| Box::new(RandomNonce)),
        })
    }
}
