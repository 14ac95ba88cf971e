//! Trait definitions for blogdesk seams.

pub mod token_store;
pub mod viewport;

pub use token_store::{MemoryTokenStore, TokenStore};
pub use viewport::{IntersectionEntry, ObserveOptions, ViewportObserver};
