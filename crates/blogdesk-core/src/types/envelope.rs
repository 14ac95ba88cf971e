//! The uniform `{code, message, data}` response wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Error, SUCCESS_CODE, TransportError};

/// Response envelope returned by every backend endpoint.
///
/// `data` is kept as raw JSON until the caller names the payload type, so
/// a single envelope decoder serves every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Returns true when the envelope carries the success code.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap the payload, or turn a non-success code into an [`ApiError`].
    ///
    /// A missing or `null` payload decodes into `()` or `Option<T>`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, Error> {
        if !self.is_success() {
            return Err(self.into_api_error().into());
        }

        serde_json::from_value(self.data).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Convert into an [`ApiError`], dropping blank messages.
    pub fn into_api_error(self) -> ApiError {
        let message = self.message.filter(|m| !m.trim().is_empty());
        ApiError::new(self.code, message)
    }
}
