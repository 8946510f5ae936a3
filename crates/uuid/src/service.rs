//! Internal implementation of the resource UUID type.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Shortest accepted UUID-shaped string (simple form).
const MIN_LEN: usize = 32;

/// Longest accepted UUID-shaped string (hyphenated form, or CIEL-style 36 hex).
const MAX_LEN: usize = 36;

/// A reference to an OpenMRS resource that is already in UUID shape.
///
/// This wrapper guarantees that the contained string passed [`ResourceUuid::is_uuid_shaped`].
/// The original spelling is kept as-is, so it can be sent back to the server unchanged.
///
/// # When to use this type
/// Use this wrapper whenever a value is about to be embedded in a request as a resource
/// reference (person, concept, location, identifier type), and for values returned by the server
/// in a `uuid` field.
///
/// Construct with [`ResourceUuid::parse`] (or `str::parse`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceUuid(String);

impl ResourceUuid {
    /// Validates that `input` is UUID-shaped and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not UUID-shaped.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if Self::is_uuid_shaped(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(UuidError::InvalidInput(format!(
            "expected 32-36 hex or '-' characters, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` looks like a UUID.
    ///
    /// This is a purely syntactic check of the whole string:
    /// - between 32 and 36 bytes long
    /// - only ASCII hex digits (either case) and `-`
    pub fn is_uuid_shaped(input: &str) -> bool {
        (MIN_LEN..=MAX_LEN).contains(&input.len())
            && input
                .bytes()
                .all(|b| b.is_ascii_hexdigit() || b == b'-')
    }

    /// Returns the reference exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceUuid {
    type Err = UuidError;

    /// Equivalent to [`ResourceUuid::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceUuid::parse(s)
    }
}

impl AsRef<str> for ResourceUuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_uuid_shaped_accepts_hyphenated_and_simple_forms() {
        assert!(ResourceUuid::is_uuid_shaped(
            "550e8400-e29b-41d4-a716-446655440000"
        ));
        assert!(ResourceUuid::is_uuid_shaped(
            "550e8400e29b41d4a716446655440000"
        ));
        assert!(ResourceUuid::is_uuid_shaped(
            "550E8400-E29B-41D4-A716-446655440000"
        ));
    }

    #[test]
    fn test_is_uuid_shaped_accepts_ciel_concept_uuid() {
        assert!(ResourceUuid::is_uuid_shaped(
            "1067AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
        ));
    }

    #[test]
    fn test_is_uuid_shaped_rejects_human_identifiers() {
        assert!(!ResourceUuid::is_uuid_shaped("P123"));
        assert!(!ResourceUuid::is_uuid_shaped("100-8"));
        assert!(!ResourceUuid::is_uuid_shaped("5089"));
        assert!(!ResourceUuid::is_uuid_shaped(""));
    }

    #[test]
    fn test_is_uuid_shaped_rejects_out_of_range_lengths() {
        assert!(!ResourceUuid::is_uuid_shaped(&"a".repeat(31)));
        assert!(ResourceUuid::is_uuid_shaped(&"a".repeat(32)));
        assert!(ResourceUuid::is_uuid_shaped(&"a".repeat(36)));
        assert!(!ResourceUuid::is_uuid_shaped(&"a".repeat(37)));
    }

    #[test]
    fn test_is_uuid_shaped_rejects_non_hex_characters() {
        assert!(!ResourceUuid::is_uuid_shaped(
            "550e8400-e29b-41d4-a716-44665544000g"
        ));
        assert!(!ResourceUuid::is_uuid_shaped(
            "550e8400 e29b 41d4 a716 446655440000"
        ));
    }

    #[test]
    fn test_parse_keeps_original_spelling() {
        let input = "550E8400-E29B-41D4-A716-446655440000";
        let parsed = ResourceUuid::parse(input).expect("should parse");
        assert_eq!(parsed.as_str(), input);
        assert_eq!(parsed.to_string(), input);
    }

    #[test]
    fn test_parse_rejects_identifier() {
        let err = ResourceUuid::parse("P123").expect_err("should reject");
        assert!(matches!(err, UuidError::InvalidInput(msg) if msg.contains("P123")));
    }

    #[test]
    fn test_serialises_as_plain_string() {
        let uuid: ResourceUuid = "1067AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
            .parse()
            .expect("should parse");
        let json = serde_json::to_string(&uuid).expect("serialize");
        assert_eq!(json, "\"1067AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\"");
    }
}
