//! Parameter normalization (RFC 5849 Section 3.4.1.3.2).

use std::collections::BTreeMap;

/// Query parameters by name, values in the order they appeared in the URI.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// OAuth protocol parameters (`oauth_*`), one value per name.
pub type OAuthParams = BTreeMap<String, String>;

pub(crate) const CONSUMER_KEY_PARAM: &str = "oauth_consumer_key";
pub(crate) const NONCE_PARAM: &str = "oauth_nonce";
pub(crate) const SIGNATURE_PARAM: &str = "oauth_signature";
pub(crate) const SIGNATURE_METHOD_PARAM: &str = "oauth_signature_method";
pub(crate) const TIMESTAMP_PARAM: &str = "oauth_timestamp";
pub(crate) const VERSION_PARAM: &str = "oauth_version";
pub(crate) const BODY_HASH_PARAM: &str = "oauth_body_hash";

/// Combine query and OAuth parameters into the normalized parameter string.
///
/// OAuth values are appended to query values of the same name, then names are
/// sorted by byte value and, within a name, values are sorted by byte value.
/// Pairs are joined as `name=value` with `&`. No encoding happens here: query
/// parameters are encoded at extraction time and OAuth values are expected to
/// be safe already.
pub fn canonical_parameter_string(query_params: &QueryParams, oauth_params: &OAuthParams) -> String {
    let mut consolidated: BTreeMap<&str, Vec<&str>> = query_params
        .iter()
        .map(|(name, values)| (name.as_str(), values.iter().map(String::as_str).collect()))
        .collect();

    for (name, value) in oauth_params {
        consolidated.entry(name.as_str()).or_default().push(value.as_str());
    }

    consolidated
        .into_iter()
        .flat_map(|(name, mut values)| {
            values.sort_unstable();
            values.into_iter().map(move |value| format!("{name}={value}"))
        })
        .collect::<Vec<_>>()
        .join("&")
}
