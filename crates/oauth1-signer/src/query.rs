//! Query parameter extraction (RFC 5849 Section 3.4.1.3.1).

use std::borrow::Cow;

use percent_encoding::percent_decode;
use tracing::debug;
use ureq::http::Uri;

use crate::encode::percent_encode;
use crate::params::QueryParams;

/// Extract query parameters from a request URI.
///
/// Duplicate keys keep every value in the order they appear, and a parameter
/// without `=` gets an empty value.
///
/// A query written with escapes (`param=token1%3Atoken2`) and one written with
/// raw characters (`param=token1:token2`) reach this function differently: the
/// first arrives pre-escaped, so its names and values are decoded and
/// percent-encoded again; the second is stored verbatim. The decision is made
/// once for the whole query by [`is_pre_escaped`].
///
/// In a pre-escaped query, a parameter whose name or value holds a malformed
/// escape (`%` not followed by two hex digits) is dropped.
pub fn extract_query_params(uri: &Uri) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(raw_query) = uri.query() else {
        return params;
    };

    let must_encode = is_pre_escaped(raw_query);

    for pair in raw_query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let (name, value) = if must_encode {
            let (Some(name), Some(value)) = (form_decode(name), form_decode(value)) else {
                debug!("Dropping query parameter with malformed escape: {pair}");
                continue;
            };
            (percent_encode(name), percent_encode(value))
        } else {
            (name.to_owned(), value.to_owned())
        };
        params.entry(name).or_default().push(value);
    }

    params
}

/// Whether a raw query string already contains escapes.
///
/// Form-decodes the whole query and compares it with the raw text; any
/// difference (a `%XX` escape or a `+`) means the caller supplied an escaped
/// query. A query that fails to decode counts as escaped.
pub fn is_pre_escaped(raw_query: &str) -> bool {
    form_decode(raw_query).is_none_or(|decoded| decoded.as_ref() != raw_query.as_bytes())
}

/// Decode `application/x-www-form-urlencoded` text: `+` becomes a space, then
/// percent-escapes are decoded. Returns `None` on a malformed escape.
fn form_decode(input: &str) -> Option<Cow<'_, [u8]>> {
    if !escapes_well_formed(input.as_bytes()) {
        return None;
    }
    if input.contains('+') {
        let spaced = input.replace('+', " ");
        Some(Cow::Owned(percent_decode(spaced.as_bytes()).collect()))
    } else {
        Some(percent_decode(input.as_bytes()).into())
    }
}

/// Every `%` is followed by two hex digits.
fn escapes_well_formed(input: &[u8]) -> bool {
    input
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .all(|(i, _)| {
            input
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        })
}
