//! Validated value types shared by the client crates.

mod base_url;
mod envelope;
mod path_segment;

pub use base_url::BaseUrl;
pub use envelope::Envelope;
pub use path_segment::PathSegment;
