//! Record payload decoding: base64 text to UTF-8, then JSON to [`EventEnvelope`].

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use std::fmt;
use std::str::FromStr;
use tracing::error;

use crate::envelope::EventEnvelope;
use crate::error::{Result, RouterError};

/// How strictly record data is checked before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Canonical standard-alphabet base64 with padding, valid UTF-8.
    #[default]
    Strict,
    /// Behaves like Node's `Buffer.from(data, 'base64').toString('utf-8')`.
    Lenient,
}

impl FromStr for DecodeMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(DecodeMode::Strict),
            "lenient" => Ok(DecodeMode::Lenient),
            other => Err(RouterError::Config(format!(
                "unknown decode mode '{}' (expected strict or lenient)",
                other
            ))),
        }
    }
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeMode::Strict => f.write_str("strict"),
            DecodeMode::Lenient => f.write_str("lenient"),
        }
    }
}

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes base64 record data into text. Failures are logged and returned.
pub fn decode_data(data: &str, mode: DecodeMode) -> Result<String> {
    let decoded = match mode {
        DecodeMode::Strict => STANDARD
            .decode(data)
            .map_err(RouterError::from)
            .and_then(|bytes| String::from_utf8(bytes).map_err(RouterError::from)),
        DecodeMode::Lenient => LENIENT
            .decode(sanitize_lenient(data))
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(RouterError::from),
    };

    if let Err(e) = &decoded {
        error!(mode = %mode, "Error decoding data: {}", e);
    }
    decoded
}

/// Reduces input to what Node would actually decode: URL-safe characters map
/// to the standard alphabet, anything else is skipped, decoding stops at the
/// first `=`, and a lone trailing character is dropped.
fn sanitize_lenient(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => out.push(c),
            '-' => out.push('+'),
            '_' => out.push('/'),
            '=' => break,
            _ => {}
        }
    }
    if out.len() % 4 == 1 {
        out.pop();
    }
    out
}

/// Parses decoded text into an envelope. Structure only: any JSON object is
/// accepted and payload fields are left for the classifier.
pub fn parse_payload(payload: &str) -> Result<EventEnvelope> {
    serde_json::from_str::<EventEnvelope>(payload).map_err(|e| {
        error!("Error parsing payload: {}", e);
        RouterError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "SGVsbG8sIHdvcmxkIQ=="; // "Hello, world!"

    #[test]
    fn test_strict_decode_valid() {
        assert_eq!(decode_data(HELLO, DecodeMode::Strict).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_strict_rejects_non_base64() {
        let err = decode_data("invalid data", DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, RouterError::Base64(_)));
    }

    #[test]
    fn test_strict_rejects_missing_padding() {
        assert!(decode_data("SGVsbG8sIHdvcmxkIQ", DecodeMode::Strict).is_err());
    }

    #[test]
    fn test_strict_rejects_invalid_utf8() {
        // 0xff 0xfe
        let err = decode_data("//4=", DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, RouterError::Utf8(_)));
    }

    #[test]
    fn test_lenient_tolerates_noise() {
        assert_eq!(
            decode_data("SGVsbG8s IHdv\ncmxkIQ", DecodeMode::Lenient).unwrap(),
            "Hello, world!"
        );
        // text after padding is ignored
        assert_eq!(decode_data("SGk=garbage", DecodeMode::Lenient).unwrap(), "Hi");
    }

    #[test]
    fn test_lenient_replaces_invalid_utf8() {
        let text = decode_data("//4=", DecodeMode::Lenient).unwrap();
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_lenient_garbage_then_fails_to_parse() {
        let text = decode_data("invalid data", DecodeMode::Lenient).unwrap();
        assert!(parse_payload(&text).is_err());
    }

    #[test]
    fn test_parse_payload_accepts_unknown_shape() {
        let envelope = parse_payload(
            r#"{"id":"a","partitionKey":"k","timestamp":1,"type":"mystery","extra":{"x":1}}"#,
        )
        .unwrap();
        assert_eq!(envelope.event_type, "mystery");
        assert!(envelope.payload_for("extra").is_some());
    }

    #[test]
    fn test_parse_payload_rejects_malformed_json() {
        let err = parse_payload(r#"{"id":"a","type":"booking_completed"}malformed"#).unwrap_err();
        assert!(matches!(err, RouterError::Json(_)));
    }

    #[test]
    fn test_parse_payload_requires_an_object() {
        let untyped = parse_payload(r#"{"id":"a"}"#).unwrap();
        assert_eq!(untyped.event_type, "");
        assert!(parse_payload(r#"[1,2,3]"#).is_err());
        assert!(parse_payload(r#""booking_completed""#).is_err());
    }

    #[test]
    fn test_parse_payload_tolerates_wrongly_typed_headers() {
        let envelope = parse_payload(
            r#"{"id":"a","partitionKey":123,"timestamp":"2024-05-01","type":"booking_completed","booking_completed":{"timestamp":1714566600123,"orderId":1,"product_provider":"Ferry Provider"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.id.as_deref(), Some("a"));
        assert_eq!(envelope.partition_key, None);
        assert_eq!(envelope.timestamp, None);
        assert!(envelope.payload_for("booking_completed").is_some());
    }

    #[test]
    fn test_decode_mode_from_str() {
        assert_eq!("Lenient".parse::<DecodeMode>().unwrap(), DecodeMode::Lenient);
        assert_eq!(" strict ".parse::<DecodeMode>().unwrap(), DecodeMode::Strict);
        assert!("loose".parse::<DecodeMode>().is_err());
    }
}
