//! Response abstractions that can carry the tag header.
//!
//! Updates follow an immutable-value contract: both operations consume the
//! response and hand back the updated one. Callers must keep the returned
//! value; the argument is never observable after the call.

use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{TagError, TagResult};

/// A response whose headers can be set or extended.
pub trait TaggableResponse: Sized {
    /// Return the response with `name` holding exactly `value`, dropping any
    /// previous values for that header.
    fn with_header(self, name: &str, value: &str) -> TagResult<Self>;

    /// Return the response with `value` added after any existing values for
    /// `name`.
    fn with_added_header(self, name: &str, value: &str) -> TagResult<Self>;
}

fn header_pair(name: &str, value: &str) -> TagResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| TagError::InvalidHeaderName(name.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| TagError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value))
}

impl TaggableResponse for HeaderMap {
    fn with_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        let (name, value) = header_pair(name, value)?;
        self.insert(name, value);
        Ok(self)
    }

    fn with_added_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        let (name, value) = header_pair(name, value)?;
        self.append(name, value);
        Ok(self)
    }
}

impl<B> TaggableResponse for http::Response<B> {
    fn with_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        let (name, value) = header_pair(name, value)?;
        self.headers_mut().insert(name, value);
        Ok(self)
    }

    fn with_added_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        let (name, value) = header_pair(name, value)?;
        self.headers_mut().append(name, value);
        Ok(self)
    }
}

/// Ordered header list, one entry per value.
impl TaggableResponse for Vec<(String, String)> {
    fn with_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        self.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.push((name.to_string(), value.to_string()));
        Ok(self)
    }

    fn with_added_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        self.push((name.to_string(), value.to_string()));
        Ok(self)
    }
}

/// Single-valued header map. Appending comma-joins onto the existing value.
///
/// Keys differing only in case are merged into one entry under `name`,
/// existing values ordered by key.
impl TaggableResponse for HashMap<String, String> {
    fn with_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        self.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self.insert(name.to_string(), value.to_string());
        Ok(self)
    }

    fn with_added_header(mut self, name: &str, value: &str) -> TagResult<Self> {
        let mut variants: Vec<String> = self
            .keys()
            .filter(|key| key.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        variants.sort();

        let mut values: Vec<String> = variants
            .iter()
            .filter_map(|key| self.remove(key))
            .collect();
        values.push(value.to_string());

        self.insert(name.to_string(), values.join(", "));
        Ok(self)
    }
}
