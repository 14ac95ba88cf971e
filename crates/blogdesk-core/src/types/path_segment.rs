//! Path segment type.

use std::fmt;

use url::Url;

use crate::error::{Error, InvalidInputError};

/// A caller-supplied identifier, percent-encoded as exactly one URL path
/// segment.
///
/// Separators (`/`, `?`, `#`) are escaped so an id can never reach another
/// route, and dot segments are refused since URL parsers collapse them.
///
/// # Example
///
/// ```
/// use blogdesk_core::PathSegment;
///
/// let id = PathSegment::new("a/b?c").unwrap();
/// assert_eq!(id.as_str(), "a%2Fb%3Fc");
/// assert!(PathSegment::new("..").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment(String);

impl PathSegment {
    /// Encode `raw` as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is empty or a dot segment.
    pub fn new(raw: &str) -> Result<Self, Error> {
        Self::validate(raw)?;

        let mut scratch =
            Url::parse("http://segment.invalid/").map_err(|e| invalid(raw, &e.to_string()))?;
        scratch
            .path_segments_mut()
            .map_err(|()| invalid(raw, "cannot encode"))?
            .clear()
            .push(raw);

        let encoded = scratch.path().trim_start_matches('/').to_string();
        Self::validate(&encoded)?;
        Ok(Self(encoded))
    }

    /// Returns the encoded segment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(invalid(s, "cannot be empty"));
        }

        // %2e decodes to '.'
        let decoded = s.to_ascii_lowercase().replace("%2e", ".");
        if decoded == "." || decoded == ".." {
            return Err(invalid(s, "cannot be '.' or '..'"));
        }

        Ok(())
    }
}

fn invalid(value: &str, reason: &str) -> Error {
    InvalidInputError::PathSegment {
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
