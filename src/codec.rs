//! Wire codec for form-encoded processors.
//!
//! Field order is preserved in both directions: encoding emits fields
//! exactly as given, and decoding returns them exactly as the provider
//! sent them, so transcripts scrub deterministically and test assertions
//! can compare whole bodies.

use url::form_urlencoded;

use crate::errors::{ConnectorError, CustomResult};

pub struct FormCodec;

impl FormCodec {
    /// Percent-encodes ordered pairs into a form body.
    pub fn encode(fields: &[(String, String)]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in fields {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }

    /// Decodes a form body into ordered pairs.
    ///
    /// A payload that is not UTF-8 or contains no `name=value` pair at all
    /// does not decode; callers convert that into a canonical failed
    /// response rather than letting it escape.
    pub fn decode(body: &[u8]) -> CustomResult<Vec<(String, String)>, ConnectorError> {
        let text = std::str::from_utf8(body)
            .map_err(|_| error_stack::report!(ConnectorError::ResponseDeserializationFailed))?;
        if !text.contains('=') {
            return Err(error_stack::report!(
                ConnectorError::ResponseDeserializationFailed
            ));
        }
        Ok(form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect())
    }

    /// Decoded pairs as an ordered JSON mapping, for the diagnostic `raw`
    /// side of a canonical response.
    pub fn pairs_to_map(
        fields: &[(String, String)],
    ) -> serde_json::Map<String, serde_json::Value> {
        fields
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_preserves_field_order() {
        let fields = vec![
            ("profile_id".to_string(), "1".to_string()),
            ("transaction_type".to_string(), "D".to_string()),
            ("card_number".to_string(), "4111111111111111".to_string()),
        ];
        assert_eq!(
            FormCodec::encode(&fields),
            "profile_id=1&transaction_type=D&card_number=4111111111111111"
        );
    }

    #[test]
    fn decode_preserves_provider_order_and_unescapes() {
        let body = b"transaction_id=abc123&error_code=101&auth_response_text=Invalid%20I%20or%20Key%20Incomplete%20Request";
        let fields = FormCodec::decode(body).unwrap();
        assert_eq!(fields[0], ("transaction_id".to_string(), "abc123".to_string()));
        assert_eq!(fields[1], ("error_code".to_string(), "101".to_string()));
        assert_eq!(
            fields[2],
            (
                "auth_response_text".to_string(),
                "Invalid I or Key Incomplete Request".to_string()
            )
        );
    }

    #[test]
    fn decode_tolerates_literal_spaces() {
        let fields = FormCodec::decode(b"auth_response_text=Exact Match&auth_code=12345A").unwrap();
        assert_eq!(fields[0].1, "Exact Match");
    }

    #[test]
    fn decode_rejects_non_form_payloads() {
        assert!(FormCodec::decode(b"").is_err());
        assert!(FormCodec::decode(b"<html>Bad Gateway</html>").is_err());
        assert!(FormCodec::decode(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        let fields = vec![("cardholder_street_address".to_string(), "123 State&St".to_string())];
        assert_eq!(
            FormCodec::encode(&fields),
            "cardholder_street_address=123+State%26St"
        );
    }
}
