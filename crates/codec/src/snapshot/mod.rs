//! The flat, string-keyed snapshot of an HTTP message.
//!
//! A [`Snapshot`] is a two-level map: fixed top-level category names
//! ([`CATEGORY_REQUEST`], [`CATEGORY_RESPONSE`], [`CATEGORY_HEADERS`],
//! [`CATEGORY_QUERY_PARAMS`]), each holding a flat `field name -> String`
//! table. Nothing nests deeper than two levels, so a snapshot survives any
//! serialization format that can express a flat string map.
//!
//! A request snapshot looks like:
//!
//! ```json
//! {
//!     "request": {
//!         "method": "POST",
//!         "path": "/foo/bar",
//!         "body": "foo=1&bar=test",
//!         "raw": "POST /foo/bar?one=testone HTTP/1.1\r\nSome-Header: test\r\n\r\nfoo=1&bar=test"
//!     },
//!     "headers": {
//!         "Some-Header": "test"
//!     },
//!     "query_params": {
//!         "one": "testone"
//!     }
//! }
//! ```
//!
//! A response snapshot replaces `query_params` with a `response` category and
//! reduces the embedded request fragment to its start line and header block,
//! keyed [`FIELD_RAW_WITHOUT_BODY`] — the response's own `raw` dump already
//! carries the response body, so the request body is not duplicated.
//!
//! Headers and query parameters may legitimately repeat under one name. Each
//! such multi-valued field is collapsed into a single string by joining its
//! values with [`MULTI_VALUE_SEPARATOR`]; [`Snapshot::header_values`] and
//! [`Snapshot::query_param_values`] split them back apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category holding the request start line, body and raw dump.
pub const CATEGORY_REQUEST: &str = "request";
/// Category holding the response status, body and raw dump.
pub const CATEGORY_RESPONSE: &str = "response";
/// Category holding the (joined) header fields of the captured message.
pub const CATEGORY_HEADERS: &str = "headers";
/// Category holding the (joined) query parameters of a captured request.
pub const CATEGORY_QUERY_PARAMS: &str = "query_params";

pub const FIELD_METHOD: &str = "method";
pub const FIELD_PATH: &str = "path";
pub const FIELD_BODY: &str = "body";
pub const FIELD_RAW: &str = "raw";
/// Request-line + header block dump of the request embedded in a response
/// snapshot; never carries body bytes.
pub const FIELD_RAW_WITHOUT_BODY: &str = "raw_without_body";
pub const FIELD_STATUS_CODE: &str = "status_code";
pub const FIELD_CONTENT_LENGTH: &str = "content_length";

/// Private separator used to join multiple values of one header or query
/// parameter into a single map entry.
///
/// The ASCII unit separator cannot appear in a valid HTTP header value, but
/// this remains a heuristic: a caller feeding arbitrary strings through a
/// snapshot can still collide with it, in which case the joined value splits
/// into more parts than were stored. A representation with native multi-value
/// support would not have this limitation.
pub const MULTI_VALUE_SEPARATOR: &str = "\u{1f}";

/// A self-contained, serializable capture of one HTTP request or response.
///
/// Created once at encode time, immutable afterwards, consumed at decode time
/// to build a brand-new live object. Carries no reference to the connection
/// it was captured from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    categories: BTreeMap<String, BTreeMap<String, String>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `category.field`, if any.
    pub fn get(&self, category: &str, field: &str) -> Option<&str> {
        self.categories.get(category)?.get(field).map(String::as_str)
    }

    /// Stores `value` under `category.field`, creating the category on demand.
    pub fn insert(&mut self, category: &str, field: &str, value: impl Into<String>) {
        self.categories.entry(category.to_owned()).or_default().insert(field.to_owned(), value.into());
    }

    /// Removes and returns the value stored under `category.field`.
    pub fn remove(&mut self, category: &str, field: &str) -> Option<String> {
        self.categories.get_mut(category)?.remove(field)
    }

    /// Returns the flat field table of one category.
    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.categories.get(name)
    }

    /// Returns the request method, e.g. `"GET"`.
    pub fn method(&self) -> Option<&str> {
        self.get(CATEGORY_REQUEST, FIELD_METHOD)
    }

    /// Returns the request path (without the query string).
    pub fn path(&self) -> Option<&str> {
        self.get(CATEGORY_REQUEST, FIELD_PATH)
    }

    /// Returns the decoded text of the request body.
    pub fn request_body(&self) -> Option<&str> {
        self.get(CATEGORY_REQUEST, FIELD_BODY)
    }

    /// Returns the full wire dump of the request.
    pub fn request_raw(&self) -> Option<&str> {
        self.get(CATEGORY_REQUEST, FIELD_RAW)
    }

    /// Returns the head-only request dump embedded in a response snapshot.
    pub fn request_raw_without_body(&self) -> Option<&str> {
        self.get(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY)
    }

    /// Returns the decoded text of the response body.
    pub fn response_body(&self) -> Option<&str> {
        self.get(CATEGORY_RESPONSE, FIELD_BODY)
    }

    /// Returns the full wire dump of the response.
    pub fn response_raw(&self) -> Option<&str> {
        self.get(CATEGORY_RESPONSE, FIELD_RAW)
    }

    /// Returns the response status code, if present and numeric.
    pub fn status_code(&self) -> Option<u16> {
        self.get(CATEGORY_RESPONSE, FIELD_STATUS_CODE)?.parse().ok()
    }

    /// Returns the buffered response body length in bytes, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.get(CATEGORY_RESPONSE, FIELD_CONTENT_LENGTH)?.parse().ok()
    }

    /// Returns all values captured for the given header name, in original order.
    pub fn header_values(&self, name: &str) -> Option<Vec<&str>> {
        self.get(CATEGORY_HEADERS, name).map(Self::split_values)
    }

    /// Returns all values captured for the given query parameter, in original order.
    pub fn query_param_values(&self, name: &str) -> Option<Vec<&str>> {
        self.get(CATEGORY_QUERY_PARAMS, name).map(Self::split_values)
    }

    /// Joins multiple field values into the single-string form stored in a snapshot.
    pub fn join_values<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
        values.into_iter().collect::<Vec<_>>().join(MULTI_VALUE_SEPARATOR)
    }

    /// Splits a stored value back into the individual field values.
    pub fn split_values(joined: &str) -> Vec<&str> {
        joined.split(MULTI_VALUE_SEPARATOR).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_REQUEST, FIELD_METHOD, "GET");
        snapshot.insert(CATEGORY_REQUEST, FIELD_PATH, "/foo/bar");

        assert_eq!(snapshot.method(), Some("GET"));
        assert_eq!(snapshot.path(), Some("/foo/bar"));
        assert_eq!(snapshot.get(CATEGORY_RESPONSE, FIELD_BODY), None);
    }

    #[test]
    fn remove_drops_single_field() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_REQUEST, FIELD_BODY, "foo=1");
        snapshot.insert(CATEGORY_REQUEST, FIELD_RAW, "GET / HTTP/1.1\r\n\r\nfoo=1");

        assert_eq!(snapshot.remove(CATEGORY_REQUEST, FIELD_BODY), Some("foo=1".to_owned()));
        assert_eq!(snapshot.request_body(), None);
        assert!(snapshot.request_raw().is_some());
    }

    #[test]
    fn join_and_split_round_trip() {
        let joined = Snapshot::join_values(["a", "b", "c"]);
        assert_eq!(Snapshot::split_values(&joined), vec!["a", "b", "c"]);

        // a single value never picks up the separator
        assert_eq!(Snapshot::join_values(["only"]), "only");
        assert_eq!(Snapshot::split_values("only"), vec!["only"]);
    }

    #[test]
    fn numeric_accessors_parse_stored_strings() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_RESPONSE, FIELD_STATUS_CODE, "404");
        snapshot.insert(CATEGORY_RESPONSE, FIELD_CONTENT_LENGTH, "2034");

        assert_eq!(snapshot.status_code(), Some(404));
        assert_eq!(snapshot.content_length(), Some(2034));
    }

    #[test]
    fn serializes_as_plain_two_level_map() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_REQUEST, FIELD_METHOD, "GET");
        snapshot.insert(CATEGORY_HEADERS, "Some-Header", "test");

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"headers":{"Some-Header":"test"},"request":{"method":"GET"}}"#);

        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
