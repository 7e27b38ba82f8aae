//! Base string URI normalization (RFC 5849 Section 3.4.1.2).

use ureq::http::Uri;

use crate::error::SignError;

/// Normalize a request URI into the base string URI.
///
/// Scheme and host are lower-cased, a port equal to the scheme default is
/// dropped, the path is kept exactly as sent on the wire (`%20` stays `%20`)
/// and an empty path becomes `/`. Query and fragment are never included.
///
/// # Errors
///
/// Returns [`SignError::RelativeUri`] if the URI has no scheme or host.
pub fn base_url(uri: &Uri) -> Result<String, SignError> {
    let (Some(scheme), Some(host)) = (uri.scheme_str(), uri.host()) else {
        return Err(SignError::RelativeUri(uri.to_string()));
    };
    let scheme = scheme.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    let port = match (scheme.as_str(), uri.port_u16()) {
        ("http", Some(80)) | ("https", Some(443)) | (_, None) => String::new(),
        (_, Some(port)) => format!(":{port}"),
    };

    let path = match uri.path() {
        "" => "/",
        path => path,
    };

    Ok(format!("{scheme}://{host}{port}{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalize(s: &str) -> String {
        base_url(&s.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_rfc_examples() {
        assert_eq!(
            normalize("https://www.example.net:8080"),
            "https://www.example.net:8080/"
        );
        assert_eq!(
            normalize("http://EXAMPLE.COM:80/r%20v/X?id=123"),
            "http://example.com/r%20v/X"
        );
    }

    #[test]
    fn test_removes_default_ports() {
        assert_eq!(
            normalize("https://api.example.com:443/test?query=param"),
            "https://api.example.com/test"
        );
        assert_eq!(
            normalize("http://api.example.com:80/test"),
            "http://api.example.com/test"
        );
    }

    #[test]
    fn test_keeps_other_ports() {
        assert_eq!(
            normalize("https://api.example.com:17443/test?query=param"),
            "https://api.example.com:17443/test"
        );
    }

    #[test]
    fn test_default_port_of_other_scheme_is_kept() {
        assert_eq!(
            normalize("http://api.example.com:443/test"),
            "http://api.example.com:443/test"
        );
        assert_eq!(
            normalize("https://api.example.com:80/test"),
            "https://api.example.com:80/test"
        );
    }

    #[test]
    fn test_removes_fragment() {
        assert_eq!(
            normalize("https://api.example.com/test?query=param#fragment"),
            "https://api.example.com/test"
        );
    }

    #[test]
    fn test_adds_trailing_slash() {
        assert_eq!(normalize("https://api.example.com"), "https://api.example.com/");
    }

    #[test]
    fn test_lowercases_scheme_and_host_only() {
        assert_eq!(
            normalize("HTTPS://API.EXAMPLE.COM/TEST"),
            "https://api.example.com/TEST"
        );
    }

    #[test]
    fn test_never_contains_query_or_fragment() {
        for input in [
            "https://example.com/a?b=c",
            "https://example.com/?#frag",
            "http://example.com:8080/x/y?z#w",
        ] {
            let normalized = normalize(input);
            assert!(!normalized.contains('?'), "{normalized}");
            assert!(!normalized.contains('#'), "{normalized}");
        }
    }

    #[test]
    fn test_relative_uri_rejected() {
        let uri: Uri = "/only/a/path?x=1".parse().unwrap();
        let err = base_url(&uri).unwrap_err();
        assert!(matches!(err, SignError::RelativeUri(_)));
        assert!(err.is_configuration());
    }
}
