//! OAuth 1.0a request signing with RSA-SHA256 and body hashing.
//!
//! Computes the `Authorization` header defined by RFC 5849, extended with the
//! `oauth_body_hash` parameter so that JSON, XML and binary payloads are bound
//! to the signature.
//!
//! The pipeline is a chain of pure functions:
//!
//! 1. [`extract_query_params`] pulls query parameters out of the request URI.
//! 2. [`canonical_parameter_string`] merges them with the OAuth parameters.
//! 3. [`base_url`] normalizes the request URI.
//! 4. [`signature_base_string`] joins method, base URL and parameters.
//! 5. [`sign_base_string`] produces the RSA-SHA256 signature.
//! 6. [`authorization_header_value`] renders the final header.
//!
//! [`Signer`] drives the pipeline for a request, and [`SigningTransport`] signs
//! every request before handing it to an HTTP client.
//!
//! ```no_run
//! use oauth1_signer::{Signer, load_private_key_from_file};
//! use ureq::http::Request;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = load_private_key_from_file("signing-key.pem")?;
//! let signer = Signer::builder()
//!     .consumer_key("my-consumer-key")
//!     .signing_key(key)
//!     .build()?;
//!
//! let mut request = Request::post("https://api.example.com/v1/items?limit=10")
//!     .body(br#"{"name":"widget"}"#.to_vec())?;
//! signer.sign(&mut request)?;
//! assert!(request.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! ```

mod base_url;
mod body;
mod encode;
mod error;
mod interceptor;
mod key;
mod params;
mod query;
mod signature;
mod signer;

pub use base_url::base_url;
pub use body::RequestBody;
pub use encode::percent_encode;
pub use error::{InterceptError, KeyError, SignError};
pub use interceptor::{SigningTransport, Transport};
pub use key::{
    load_private_key, load_private_key_from_file, load_private_key_from_p12,
    load_private_key_from_p12_file,
};
pub use params::{OAuthParams, QueryParams, canonical_parameter_string};
pub use query::{extract_query_params, is_pre_escaped};
pub use signature::{
    authorization_header_value, body_hash, sign_base_string, signature_base_string,
};
pub use signer::{Clock, NonceSource, RandomNonce, Signer, SignerBuilder, SystemClock};

/// Name of the header carrying the OAuth credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "RSA-SHA256";

/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
