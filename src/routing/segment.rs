//! Path segmentation.
//!
//! Both patterns and request paths go through the same splitter, so
//! `"/widgets/"`, `"widgets"` and `"//widgets"` all address the same node.
//! Request segments are percent-decoded one at a time, after splitting, so an
//! encoded `%2F` stays inside its segment.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker that introduces a named parameter segment in a pattern.
pub const PARAM_MARKER: char = ':';

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+$").expect("parameter name pattern compiles"));

/// Split a URL path into its non-empty `/`-delimited segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical form of a path: a leading `/` followed by the segments.
///
/// The root (zero segments) normalizes to `"/"`.
pub fn normalize(path: &str) -> String {
    let parts = segments(path);
    if parts.is_empty() {
        return "/".to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    out
}

/// Returns the parameter name if `segment` is a parameter segment.
///
/// A bare marker yields `Some("")`; callers reject it.
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(PARAM_MARKER)
}

/// Whether `name` can be used as a parameter name (`\w+`).
///
/// Link templates substitute exactly this alphabet.
pub fn is_valid_param_name(name: &str) -> bool {
    PARAM_NAME.is_match(name)
}

/// Percent-decode one request segment; `None` if the bytes are not UTF-8.
pub fn decode(segment: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(segment).ok()
}
