//! blogdesk-core - Core types and primitives for the blogdesk client.
//!
//! This crate holds everything that does not talk to the network: the
//! request configuration, the error taxonomy, the response envelope, the
//! credential token and its storage seam, the wire model types, and the
//! viewport visibility helper.
//!
//! # Example
//!
//! ```
//! use blogdesk_core::{ApiConfig, Environment, sanitize_token};
//!
//! let config = ApiConfig::for_env(Environment::Development);
//! assert_eq!(config.base_origin().as_str(), "http://localhost:8080");
//!
//! assert_eq!(sanitize_token(" abc\u{00A0}def\n"), "abcdef");
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod token;
pub mod traits;
pub mod types;
pub mod visibility;

pub use config::{ApiConfig, Environment};
pub use credentials::Credentials;
pub use error::Error;
pub use token::{CredentialToken, sanitize_token};
pub use traits::{MemoryTokenStore, TokenStore};
pub use types::{BaseUrl, Envelope, PathSegment};
pub use visibility::{VisibilityOptions, VisibilityTrigger};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
