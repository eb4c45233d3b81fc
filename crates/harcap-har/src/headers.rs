//! Header normalization and merge rules.
//!
//! The CDP Network domain delivers headers as a JSON object mapping name
//! to value. HAR wants an ordered list of `{name, value}` pairs. These
//! are pure functions; the correlator decides when to call them.

use serde_json::Value;

use crate::model::Header;

/// Convert a protocol header object into a HAR header list.
///
/// Non-object input (null, missing field) yields an empty list rather
/// than an error. Non-string values are rendered as their JSON text,
/// which matches how Chrome reports numeric pseudo-headers.
pub fn normalize_headers(raw: &Value) -> Vec<Header> {
    let Some(map) = raw.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(name, value)| Header {
            name: name.clone(),
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
        .collect()
}

/// Merge `extra` into `target`, skipping any name already present.
///
/// Matching is case-sensitive and exact: first-seen wins, so headers the
/// browser synthesizes out-of-band never override ones the request
/// carried explicitly. Merging the same set twice is a no-op.
pub fn merge_missing(target: &mut Vec<Header>, extra: Vec<Header>) {
    for header in extra {
        if !target.iter().any(|h| h.name == header.name) {
            target.push(header);
        }
    }
}

/// Look up a header value by name, ignoring ASCII case.
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}
