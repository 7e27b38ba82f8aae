//! OAuth 1.0a signature generation (RFC 5849) with the body hash extension.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};

use crate::encode::percent_encode;
use crate::error::SignError;
use crate::params::OAuthParams;

/// Base64-encoded SHA-256 digest of the request payload (`oauth_body_hash`).
///
/// An empty payload hashes to `47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=`.
pub fn body_hash(payload: &[u8]) -> String {
    BASE64_STANDARD.encode(Sha256::digest(payload))
}

/// Build OAuth signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_base_url&encoded_parameters`
pub fn signature_base_string(method: &str, base_url: &str, param_string: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(param_string)
    )
}

/// Sign the base string with RSA-SHA256 (PKCS#1 v1.5) and return the
/// base64-encoded signature.
///
/// # Errors
///
/// Returns [`SignError::Crypto`] if the key cannot produce a signature, for
/// example when its modulus is too short for a SHA-256 `DigestInfo`.
pub fn sign_base_string(
    base_string: &str,
    signing_key: &SigningKey<Sha256>,
) -> Result<String, SignError> {
    let signature = signing_key
        .try_sign(base_string.as_bytes())
        .map_err(SignError::Crypto)?;
    Ok(BASE64_STANDARD.encode(signature.to_bytes()))
}

/// Build OAuth Authorization header from OAuth params (RFC 5849 Section 3.5.1).
///
/// Values are written as given; `oauth_signature` must already be
/// percent-encoded. Parameters appear in ascending name order.
pub fn authorization_header_value(oauth_params: &OAuthParams) -> String {
    let header_parts: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect();
    format!("OAuth {}", header_parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tests::{UNDERSIZED_PKCS1_KEY, test_key};
    use crate::key::load_private_key;
    use crate::params::{QueryParams, canonical_parameter_string};
    use crate::query::extract_query_params;
    use crate::base_url::base_url;
    use pretty_assertions::assert_eq;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::signature::Verifier;

    const EMPTY_BODY_HASH: &str = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

    #[test]
    fn test_body_hash() {
        assert_eq!(body_hash(&[]), EMPTY_BODY_HASH);
        assert_eq!(body_hash(b""), EMPTY_BODY_HASH);
        assert_eq!(
            body_hash("{\"foõ\":\"bar\"}".as_bytes()),
            "+Z+PWW2TJDnPvRcTgol+nKO3LT7xm8smnsg+//XMIyI="
        );
    }

    #[test]
    fn test_base_string_when_query_escaped_in_uri() {
        let uri = "https://example.com/?param=token1%3Atoken2".parse().unwrap();
        let params = canonical_parameter_string(&extract_query_params(&uri), &OAuthParams::new());

        assert_eq!(
            signature_base_string("GET", "https://example.com", &params),
            "GET&https%3A%2F%2Fexample.com&param%3Dtoken1%253Atoken2"
        );
    }

    #[test]
    fn test_base_string_when_query_not_escaped_in_uri() {
        let uri = "https://example.com/?param=token1:token2".parse().unwrap();
        let params = canonical_parameter_string(&extract_query_params(&uri), &OAuthParams::new());

        assert_eq!(
            signature_base_string("GET", "https://example.com", &params),
            "GET&https%3A%2F%2Fexample.com&param%3Dtoken1%3Atoken2"
        );
    }

    #[test]
    fn test_base_string_nominal() {
        let mut query_params = QueryParams::new();
        query_params.insert("param2".to_owned(), vec!["hello".to_owned()]);
        query_params.insert(
            "first_param".to_owned(),
            vec!["value".to_owned(), "othervalue".to_owned()],
        );
        let mut oauth_params = OAuthParams::new();
        oauth_params.insert("oauth_nonce".to_owned(), "randomnonce".to_owned());
        oauth_params.insert("oauth_body_hash".to_owned(), "body/hash".to_owned());

        let params = canonical_parameter_string(&query_params, &oauth_params);

        assert_eq!(
            signature_base_string("post", "https://api.example.com", &params),
            "POST&https%3A%2F%2Fapi.example.com&first_param%3Dothervalue%26first_param%3Dvalue%26oauth_body_hash%3Dbody%2Fhash%26oauth_nonce%3Drandomnonce%26param2%3Dhello"
        );
    }

    #[test]
    fn test_base_string_integrated_with_xml_body() {
        let body = r#"<?xml version="1.0" encoding="Windows-1252"?><ns2:TerminationInquiryRequest xmlns:ns2="http://mastercard.com/termination"><AcquirerId>1996</AcquirerId><TransactionReferenceNumber>1</TransactionReferenceNumber><Merchant><Name>TEST</Name><DoingBusinessAsName>TEST</DoingBusinessAsName><PhoneNumber>5555555555</PhoneNumber><NationalTaxId>1234567890</NationalTaxId><Address><Line1>5555 Test Lane</Line1><City>TEST</City><CountrySubdivision>XX</CountrySubdivision><PostalCode>12345</PostalCode><Country>USA</Country></Address><Principal><FirstName>John</FirstName><LastName>Smith</LastName><NationalId>1234567890</NationalId><PhoneNumber>5555555555</PhoneNumber><Address><Line1>5555 Test Lane</Line1><City>TEST</City><CountrySubdivision>XX</CountrySubdivision><PostalCode>12345</PostalCode><Country>USA</Country></Address><DriversLicense><Number>1234567890</Number><CountrySubdivision>XX</CountrySubdivision></DriversLicense></Principal></Merchant></ns2:TerminationInquiryRequest>"#;
        let uri = "https://sandbox.api.mastercard.com/fraud/merchant/v1/termination-inquiry?Format=XML&PageOffset=0&PageLength=10"
            .parse()
            .unwrap();

        let mut oauth_params = OAuthParams::new();
        oauth_params.insert(
            "oauth_consumer_key".to_owned(),
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_owned(),
        );
        oauth_params.insert("oauth_nonce".to_owned(), "1111111111111111111".to_owned());
        oauth_params.insert("oauth_signature_method".to_owned(), "RSA-SHA256".to_owned());
        oauth_params.insert("oauth_timestamp".to_owned(), "1111111111".to_owned());
        oauth_params.insert("oauth_version".to_owned(), "1.0".to_owned());
        oauth_params.insert("oauth_body_hash".to_owned(), body_hash(body.as_bytes()));

        let params = canonical_parameter_string(&extract_query_params(&uri), &oauth_params);
        let base = signature_base_string("POST", &base_url(&uri).unwrap(), &params);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fsandbox.api.mastercard.com%2Ffraud%2Fmerchant%2Fv1%2Ftermination-inquiry&Format%3DXML%26PageLength%3D10%26PageOffset%3D0%26oauth_body_hash%3Dh2Pd7zlzEZjZVIKB4j94UZn%2FxxoR3RoCjYQ9%2FJdadGQ%3D%26oauth_consumer_key%3Dxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx%26oauth_nonce%3D1111111111111111111%26oauth_signature_method%3DRSA-SHA256%26oauth_timestamp%3D1111111111%26oauth_version%3D1.0"
        );
    }

    #[test]
    fn test_sign_base_string_verifies() {
        let key = test_key();
        let signing_key = SigningKey::<Sha256>::new(key.clone());

        let encoded = sign_base_string("baseString", &signing_key).unwrap();
        let raw = BASE64_STANDARD.decode(&encoded).unwrap();
        assert_eq!(raw.len(), 256);

        let signature = Signature::try_from(raw.as_slice()).unwrap();
        let verifying_key = VerifyingKey::<Sha256>::new(key.to_public_key());
        assert!(verifying_key.verify(b"baseString", &signature).is_ok());
        assert!(verifying_key.verify(b"otherString", &signature).is_err());
    }

    #[test]
    fn test_sign_base_string_is_deterministic() {
        let signing_key = SigningKey::<Sha256>::new(test_key());
        assert_eq!(
            sign_base_string("baseString", &signing_key).unwrap(),
            sign_base_string("baseString", &signing_key).unwrap()
        );
    }

    #[test]
    fn test_sign_with_undersized_key_fails() {
        let key = load_private_key(UNDERSIZED_PKCS1_KEY.as_bytes()).unwrap();
        let signing_key = SigningKey::<Sha256>::new(key);

        let result = sign_base_string("some string", &signing_key);
        assert!(matches!(result, Err(SignError::Crypto(_))));
    }

    #[test]
    fn test_authorization_header_value() {
        let mut params = OAuthParams::new();
        params.insert("oauth_version".to_owned(), "1.0".to_owned());
        params.insert("oauth_consumer_key".to_owned(), "key".to_owned());
        params.insert("oauth_signature".to_owned(), percent_encode("ab+c/="));

        assert_eq!(
            authorization_header_value(&params),
            r#"OAuth oauth_consumer_key="key", oauth_signature="ab%2Bc%2F%3D", oauth_version="1.0""#
        );
    }
}
