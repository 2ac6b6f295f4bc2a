//! Response cache tagging for tag-based proxy invalidation.
//!
//! This crate provides:
//! - `ResponseTagger` - Per-request tag accumulation and header application
//! - `TagEncoder` - Header naming and value encoding, with `JoinedTagEncoder`
//!   and `PrefixedTagEncoder` as stock implementations
//! - `TaggableResponse` - Replace/append header updates for `http` responses
//!   and plain header collections
//! - `TagHeaderConfig` - File-backed tag header settings
//!
//! # Example
//!
//! ```ignore
//! use cache_tags::{JoinedTagEncoder, ResponseTagger, TagMode};
//!
//! let encoder = JoinedTagEncoder::default();
//! let mut tagger = ResponseTagger::new(&encoder);
//!
//! tagger.add_tags(["product-42", "category-7"]);
//! tagger.add_tag("homepage");
//!
//! // Responses are consumed and returned updated.
//! let response = tagger.tag_response_with(response, TagMode::Replace)?;
//! ```

mod config;
mod encoder;
mod error;
mod response;
mod tagger;

pub use config::*;
pub use encoder::*;
pub use error::*;
pub use response::*;
pub use tagger::*;
