//! Per-request cache tag accumulation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::encoder::TagEncoder;
use crate::error::TagResult;
use crate::response::TaggableResponse;

/// How the tag header is applied to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Add the tag header next to any values already present.
    #[default]
    Append,
    /// Overwrite any existing values of the tag header.
    Replace,
}

/// Collects cache tags while a request is handled and writes them into the
/// response's tag header.
///
/// Tags are only ever added. Create one tagger per request and drop it when
/// the response is sent; it holds no locks and must not be shared between
/// concurrent requests.
///
/// The encoder is held as `E`, so pass `&encoder`, a `Box` or an `Arc` to
/// reuse one encoder across requests without copying it.
///
/// # Example
///
/// ```rust,ignore
/// let encoder = JoinedTagEncoder::default();
/// let mut tagger = ResponseTagger::new(&encoder);
/// tagger.add_tags(["product-42", "category-7"]);
///
/// let response = tagger.tag_response(response)?;
/// ```
#[derive(Debug, Clone)]
pub struct ResponseTagger<E> {
    encoder: E,
    tags: Vec<String>,
}

impl<E: TagEncoder> ResponseTagger<E> {
    /// Create a tagger with no tags.
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            tags: Vec::new(),
        }
    }

    /// Append tags in order. Duplicates are kept; the encoder decides what
    /// to do with them.
    pub fn add_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        trace!(count = self.tags.len(), "cache tags added");
        self
    }

    /// Append a single tag.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.add_tags(std::iter::once(tag))
    }

    /// Whether at least one tag has been added.
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Tags added so far, in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Name of the header that will hold the tags.
    pub fn tags_header_name(&self) -> &str {
        self.encoder.header_name()
    }

    /// Encoded header value for the current tags.
    ///
    /// An empty tag set is still handed to the encoder.
    pub fn tags_header_value(&self) -> TagResult<String> {
        self.encoder.encode(&self.tags)
    }

    /// Add the tag header to `response`, keeping existing values.
    pub fn tag_response<R: TaggableResponse>(&self, response: R) -> TagResult<R> {
        self.tag_response_with(response, TagMode::default())
    }

    /// Apply the tag header to `response` using `mode`.
    ///
    /// Consumes the response and returns the tagged one.
    pub fn tag_response_with<R: TaggableResponse>(
        &self,
        response: R,
        mode: TagMode,
    ) -> TagResult<R> {
        let name = self.tags_header_name();
        let value = self.tags_header_value()?;

        debug!(header = name, tags = self.tags.len(), ?mode, "tagging response");

        match mode {
            TagMode::Replace => response.with_header(name, &value),
            TagMode::Append => response.with_added_header(name, &value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{JoinedTagEncoder, PrefixedTagEncoder};
    use crate::error::TagError;

    struct FailingEncoder;

    impl TagEncoder for FailingEncoder {
        fn header_name(&self) -> &str {
            "X-Cache-Tags"
        }

        fn encode(&self, _tags: &[String]) -> TagResult<String> {
            Err(TagError::Encoding("tag list rejected".to_string()))
        }
    }

    // === Accumulation Tests ===

    #[test]
    fn test_new_tagger_has_no_tags() {
        let tagger = ResponseTagger::new(JoinedTagEncoder::default());
        assert!(!tagger.has_tags());
        assert!(tagger.tags().is_empty());
    }

    #[test]
    fn test_add_tags_preserves_order_and_duplicates() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tags(["b", "a"]).add_tags(["b"]);
        assert_eq!(tagger.tags(), ["b", "a", "b"]);
    }

    #[test]
    fn test_add_tags_is_cumulative() {
        let mut split = ResponseTagger::new(JoinedTagEncoder::default());
        split.add_tags(["a", "b"]).add_tags(["b", "c"]);

        let mut whole = ResponseTagger::new(JoinedTagEncoder::default());
        whole.add_tags(["a", "b", "b", "c"]);

        assert_eq!(split.tags(), whole.tags());
    }

    #[test]
    fn test_add_empty_list_keeps_tagger_empty() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tags(Vec::<String>::new());
        assert!(!tagger.has_tags());
    }

    #[test]
    fn test_add_tag_accepts_owned_strings() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tag(format!("product-{}", 42)).add_tag("category");
        assert_eq!(tagger.tags(), ["product-42", "category"]);
    }

    // === Projection Tests ===

    #[test]
    fn test_header_name_comes_from_encoder() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::new("Surrogate-Key"));
        assert_eq!(tagger.tags_header_name(), "Surrogate-Key");
        tagger.add_tag("a");
        assert_eq!(tagger.tags_header_name(), "Surrogate-Key");
    }

    #[test]
    fn test_header_value_with_no_tags_is_encoder_defined() {
        let tagger = ResponseTagger::new(JoinedTagEncoder::default());
        assert_eq!(tagger.tags_header_value().unwrap(), "");
    }

    #[test]
    fn test_header_value_through_prefixed_encoder() {
        let encoder = PrefixedTagEncoder::new("shop-", JoinedTagEncoder::default());
        let mut tagger = ResponseTagger::new(&encoder);
        tagger.add_tags(["a", "b"]);
        assert_eq!(tagger.tags_header_value().unwrap(), "shop-a,shop-b");
    }

    #[test]
    fn test_encoder_error_is_propagated() {
        let mut tagger = ResponseTagger::new(FailingEncoder);
        tagger.add_tag("a");

        let expected = TagError::Encoding("tag list rejected".to_string());
        assert_eq!(tagger.tags_header_value(), Err(expected.clone()));
        assert_eq!(tagger.tag_response(Vec::<(String, String)>::new()), Err(expected));
    }

    // === Apply Tests ===

    #[test]
    fn test_tag_response_defaults_to_append() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tags(["a", "b"]);

        let headers = vec![("X-Cache-Tags".to_string(), "old".to_string())];
        let headers = tagger.tag_response(headers).unwrap();

        assert_eq!(
            headers,
            vec![
                ("X-Cache-Tags".to_string(), "old".to_string()),
                ("X-Cache-Tags".to_string(), "a,b".to_string()),
            ]
        );
    }

    #[test]
    fn test_tag_response_replace() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tags(["a", "b"]);

        let headers = vec![("X-Cache-Tags".to_string(), "old".to_string())];
        let headers = tagger.tag_response_with(headers, TagMode::Replace).unwrap();

        assert_eq!(headers, vec![("X-Cache-Tags".to_string(), "a,b".to_string())]);
    }

    #[test]
    fn test_tagging_does_not_clear_tags() {
        let mut tagger = ResponseTagger::new(JoinedTagEncoder::default());
        tagger.add_tag("a");

        let _ = tagger.tag_response(Vec::<(String, String)>::new()).unwrap();
        assert!(tagger.has_tags());
        assert_eq!(tagger.tags(), ["a"]);
    }

    // === TagMode Tests ===

    #[test]
    fn test_tag_mode_default_is_append() {
        assert_eq!(TagMode::default(), TagMode::Append);
    }

    #[test]
    fn test_tag_mode_serialization() {
        assert_eq!(serde_json::to_string(&TagMode::Replace).unwrap(), r#""replace""#);
        let mode: TagMode = serde_json::from_str(r#""append""#).unwrap();
        assert_eq!(mode, TagMode::Append);
    }
}
