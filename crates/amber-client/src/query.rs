//! Query-string and path-segment construction
//!
//! Every wrapper that takes optional filters funnels them through
//! [`QueryParams`], so identical options always yield an identical query
//! string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

/// Characters `encodeURIComponent` leaves alone; everything else is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path segment.
///
/// `/`, `?`, `#` and `%` are all escaped, so the result always stays one
/// segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Ordered set of query parameters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string parameter if it is present and non-empty
    pub fn push_str(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Add a numeric parameter if it is present
    pub fn push_num(&mut self, key: &'static str, value: Option<u64>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Add a parameter whose value renders through `Display`, if present
    pub fn push_display<T: std::fmt::Display>(
        &mut self,
        key: &'static str,
        value: Option<&T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.push_str(key, Some(&value.to_string()));
        }
        self
    }

    /// Whether no parameter made it in
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in insertion order
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Render as `application/x-www-form-urlencoded`, in insertion order
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    /// Append `?query` to `path`, or return `path` untouched when empty
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}
