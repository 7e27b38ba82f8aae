//! RFC 3986 percent-encoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode bytes per RFC 3986 Section 2.1.
///
/// Every byte outside the unreserved set becomes `%XX` with uppercase hex
/// digits. Input that is already percent-encoded is encoded again, so `%3A`
/// turns into `%253A`.
pub fn percent_encode(input: impl AsRef<[u8]>) -> String {
    percent_encoding::percent_encode(input.as_ref(), OAUTH_ENCODE_SET).to_string()
}
