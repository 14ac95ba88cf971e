//! Credential token type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, InvalidInputError};

/// Strip every character that must not appear in a bearer token.
///
/// Removes Unicode whitespace, ASCII control characters (U+0000 to U+001F
/// and U+007F) and the non-breaking space U+00A0.
///
/// # Example
///
/// ```
/// use blogdesk_core::sanitize_token;
///
/// assert_eq!(sanitize_token("ab c\t\u{7f}d\u{a0}"), "abcd");
/// ```
pub fn sanitize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_control() && *c != '\u{00A0}')
        .collect()
}

/// A sanitized bearer token issued by the backend at login.
///
/// The only way to obtain a `CredentialToken` is through sanitization, so a
/// value of this type is never empty and never carries whitespace or
/// control characters.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialToken(String);

impl CredentialToken {
    /// Sanitize `raw` into a token.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is left after sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, Error> {
        let cleaned = sanitize_token(raw.as_ref());
        if cleaned.is_empty() {
            return Err(InvalidInputError::Token {
                reason: "empty after sanitization".to_string(),
            }
            .into());
        }
        Ok(Self(cleaned))
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers or persisting
    /// the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CredentialToken")
            .field(&"[REDACTED]")
            .finish()
    }
}

impl Serialize for CredentialToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CredentialToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CredentialToken::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_controls_and_nbsp() {
        let raw = " eyJh bGci\r\n\tOiJ\u{0000}IUz\u{001F}I1\u{007F}Ni\u{00A0}J9 ";
        assert_eq!(sanitize_token(raw), "eyJhbGciOiJIUzI1NiJ9");
    }

    #[test]
    fn strips_unicode_whitespace() {
        assert_eq!(sanitize_token("a\u{2003}b\u{3000}c\u{2028}d"), "abcd");
    }

    #[test]
    fn clean_token_is_unchanged() {
        assert_eq!(sanitize_token("abc.DEF-123_x"), "abc.DEF-123_x");
    }

    #[test]
    fn sanitized_result_has_no_forbidden_characters() {
        let samples = [
            "\u{00A0}\u{00A0}token\u{00A0}",
            "to\u{0007}ken\u{001B}[0m",
            "  multi   word token  ",
            "\u{FEFF}\u{200B}token",
        ];
        for raw in samples {
            let cleaned = sanitize_token(raw);
            assert!(cleaned.chars().all(|c| !c.is_whitespace()
                && !c.is_ascii_control()
                && c != '\u{00A0}'));
        }
    }

    #[test]
    fn empty_after_sanitization_is_rejected() {
        assert!(CredentialToken::new(" \n\u{00A0}\t").is_err());
        assert!(CredentialToken::new("").is_err());
    }

    #[test]
    fn token_hides_value_in_debug() {
        let token = CredentialToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn deserialize_sanitizes() {
        let token: CredentialToken = serde_json::from_str("\"ab c\\n\"").unwrap();
        assert_eq!(token.as_str(), "abc");
        assert!(serde_json::from_str::<CredentialToken>("\" \"").is_err());
    }
}
