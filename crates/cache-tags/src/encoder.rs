//! Tag header encoders.

use std::collections::HashSet;
use std::sync::Arc;

use http::header::HeaderValue;

use crate::error::{TagError, TagResult};

/// Header names understood by tag-aware proxies.
pub mod header_names {
    /// Default header carrying cache tags.
    pub const X_CACHE_TAGS: &str = "X-Cache-Tags";
}

/// Separator used by [`JoinedTagEncoder`] unless configured otherwise.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Substituted for separators and control characters inside a tag.
const ESCAPE_CHAR: char = '_';

/// Check that `separator` can sit between escaped tags in a header value.
///
/// It must be non-empty, legal in a header value, and free of the escape
/// character so escaping can never produce a separator.
pub(crate) fn check_separator(separator: &str) -> TagResult<()> {
    if separator.is_empty()
        || separator.contains(ESCAPE_CHAR)
        || HeaderValue::from_str(separator).is_err()
    {
        return Err(TagError::InvalidSeparator(separator.to_string()));
    }
    Ok(())
}

/// Names the tag header and serializes a tag list into its value.
///
/// Implementations own the whole wire format: joining, escaping and
/// deduplication all happen here, never in the tagger.
pub trait TagEncoder {
    /// Name of the HTTP header holding the tags.
    fn header_name(&self) -> &str;

    /// Encode the tags into a header value.
    fn encode(&self, tags: &[String]) -> TagResult<String>;
}

impl<T: TagEncoder + ?Sized> TagEncoder for &T {
    fn header_name(&self) -> &str {
        (**self).header_name()
    }

    fn encode(&self, tags: &[String]) -> TagResult<String> {
        (**self).encode(tags)
    }
}

impl<T: TagEncoder + ?Sized> TagEncoder for Box<T> {
    fn header_name(&self) -> &str {
        (**self).header_name()
    }

    fn encode(&self, tags: &[String]) -> TagResult<String> {
        (**self).encode(tags)
    }
}

impl<T: TagEncoder + ?Sized> TagEncoder for Arc<T> {
    fn header_name(&self) -> &str {
        (**self).header_name()
    }

    fn encode(&self, tags: &[String]) -> TagResult<String> {
        (**self).encode(tags)
    }
}

/// Joins tags into a single separated list.
///
/// Separators and ASCII control characters other than tab inside a tag are
/// replaced with `_` so one tag can never split into two on the proxy side
/// and the value stays header-safe. Empty tags are dropped and duplicates
/// keep their first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedTagEncoder {
    header_name: String,
    separator: String,
}

impl Default for JoinedTagEncoder {
    fn default() -> Self {
        Self {
            header_name: header_names::X_CACHE_TAGS.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl JoinedTagEncoder {
    /// Create an encoder writing to the given header.
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            ..Default::default()
        }
    }

    /// Use a different separator between tags.
    ///
    /// Rejects empty separators, separators containing `_` and separators
    /// that are not valid in a header value.
    pub fn try_with_separator(mut self, separator: impl Into<String>) -> TagResult<Self> {
        let separator = separator.into();
        check_separator(&separator)?;
        self.separator = separator;
        Ok(self)
    }

    /// The separator placed between tags.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn escape(&self, tag: &str) -> String {
        tag.replace(self.separator.as_str(), &ESCAPE_CHAR.to_string())
            .chars()
            .map(|c| if c.is_ascii_control() && c != '\t' { ESCAPE_CHAR } else { c })
            .collect()
    }
}

impl TagEncoder for JoinedTagEncoder {
    fn header_name(&self) -> &str {
        &self.header_name
    }

    fn encode(&self, tags: &[String]) -> TagResult<String> {
        let mut seen = HashSet::new();
        let escaped: Vec<String> = tags
            .iter()
            .filter(|tag| !tag.is_empty())
            .map(|tag| self.escape(tag))
            .filter(|tag| seen.insert(tag.clone()))
            .collect();

        Ok(escaped.join(&self.separator))
    }
}

/// Prepends a fixed prefix to every tag before handing off to another encoder.
///
/// Lets several sites share one proxy without their tags colliding.
#[derive(Debug, Clone)]
pub struct PrefixedTagEncoder<E> {
    prefix: String,
    inner: E,
}

impl<E: TagEncoder> PrefixedTagEncoder<E> {
    /// Wrap `inner`, prefixing each tag with `prefix`.
    pub fn new(prefix: impl Into<String>, inner: E) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    /// The prefix applied to each tag.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<E: TagEncoder> TagEncoder for PrefixedTagEncoder<E> {
    fn header_name(&self) -> &str {
        self.inner.header_name()
    }

    fn encode(&self, tags: &[String]) -> TagResult<String> {
        let prefixed: Vec<String> = tags
            .iter()
            .map(|tag| format!("{}{}", self.prefix, tag))
            .collect();
        self.inner.encode(&prefixed)
    }
}
