//! Transcript scrubbing.
//!
//! Captured request/response transcripts pass through here before any log
//! sink sees them. Scrubbing is a pure text transform: each sensitive
//! field's value is replaced with a fixed marker, everything else is left
//! byte-identical. Patterns anchor on the field name followed by its
//! delimiter, so a transaction id that merely contains the word "card"
//! is never touched.

use regex::Regex;

/// The fixed redaction marker written in place of a sensitive value.
pub const FILTERED: &str = "[FILTERED]";

/// Applies each pattern in turn. Every pattern must carry exactly one
/// capture group holding the `name=` / `"Name":` prefix to preserve.
pub fn scrub(transcript: &str, patterns: &[Regex]) -> String {
    let mut scrubbed = transcript.to_string();
    for pattern in patterns {
        scrubbed = pattern
            .replace_all(&scrubbed, format!("${{1}}{FILTERED}"))
            .into_owned();
    }
    scrubbed
}

/// Pattern for a form-encoded field: `name=value` up to the next `&`,
/// quote or whitespace.
pub fn form_field(name: &str) -> Regex {
    Regex::new(&format!(r#"((?:^|[&?"\s]){}=)[^&"\s]+"#, regex::escape(name)))
        .unwrap_or_else(|_| unreachable!("static scrub pattern"))
}

/// Pattern for a JSON string field: `"name": "value"`.
pub fn json_string_field(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)("{}"\s*:\s*")[^"]*"#,
        regex::escape(name)
    ))
    .unwrap_or_else(|_| unreachable!("static scrub pattern"))
}

/// Pattern for an HTTP basic-authorization header value.
pub fn basic_auth_header() -> Regex {
    Regex::new(r"(?i)(authorization:\s*basic\s+)[A-Za-z0-9+/=]+")
        .unwrap_or_else(|_| unreachable!("static scrub pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_scrubs_only_the_value() {
        let patterns = vec![form_field("card_number"), form_field("cvv2")];
        let scrubbed = scrub(
            "invoice_number=123&card_number=4111111111111111&cvv2=123&transaction_amount=1.00",
            &patterns,
        );
        assert_eq!(
            scrubbed,
            "invoice_number=123&card_number=[FILTERED]&cvv2=[FILTERED]&transaction_amount=1.00"
        );
    }

    #[test]
    fn look_alike_substrings_survive() {
        let patterns = vec![form_field("card_number")];
        let transcript = "transaction_id=card_number_lookalike_77&stored_card_number_hint=none";
        // `stored_card_number` is a different field name; only the exact
        // `card_number` field may be redacted.
        assert_eq!(scrub(transcript, &patterns), transcript);
    }

    #[test]
    fn json_field_scrubs_value_only() {
        let patterns = vec![json_string_field("number"), json_string_field("cvc")];
        let scrubbed = scrub(
            r#"{"card":{"number":"5555555555554444","cvc":"111","expMonth":"12"}}"#,
            &patterns,
        );
        assert_eq!(
            scrubbed,
            r#"{"card":{"number":"[FILTERED]","cvc":"[FILTERED]","expMonth":"12"}}"#
        );
    }

    #[test]
    fn basic_auth_value_is_redacted() {
        let patterns = vec![basic_auth_header()];
        let scrubbed = scrub("authorization: Basic Y2xpZW50OmtleQ==", &patterns);
        assert_eq!(scrubbed, "authorization: Basic [FILTERED]");
    }

    #[test]
    fn scrub_is_total_on_arbitrary_text() {
        let patterns = vec![form_field("cvv2")];
        assert_eq!(scrub("", &patterns), "");
        assert_eq!(scrub("no fields here", &patterns), "no fields here");
    }
}
