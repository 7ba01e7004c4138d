//! The Message–Map codec: live HTTP messages ⇄ flat snapshots.
//!
//! Two symmetric halves, mirroring each other:
//!
//! - Request side: [`encode_request`] captures a live
//!   `http::Request<BodySource>` into a [`Snapshot`]; [`decode_request`]
//!   rebuilds a brand-new request from one.
//! - Response side: [`encode_response`] captures an
//!   [`Exchange`] (response + originating request) with a reduced request
//!   fragment embedded; [`decode_response`] rebuilds the exchange against a
//!   synthetic originating request.
//!
//! Encoding drains the live object's one-shot body stream and replaces it
//! with a rewindable buffer, so the object survives encoding re-readable.
//! Decoding is a pure function of the snapshot and never touches the
//! original connection.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot
//! [`Exchange`]: crate::protocol::Exchange

use crate::snapshot::{CATEGORY_HEADERS, Snapshot};
use http::HeaderMap;

mod request;
mod response;
pub(crate) mod wire;

pub use request::decode_request;
pub use request::encode_request;
pub use response::decode_response;
pub use response::encode_response;

/// Joins each header's values with the private separator and stores them
/// under the canonical MIME form of the name (`some-header` -> `Some-Header`).
///
/// `http::HeaderMap` lowercases names on insert; the canonical form is what
/// the wire conventionally shows and what snapshot consumers look up.
fn fill_headers(snapshot: &mut Snapshot, headers: &HeaderMap) {
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_owned())
            .collect();
        let joined = Snapshot::join_values(values.iter().map(String::as_str));
        snapshot.insert(CATEGORY_HEADERS, &canonical_header_name(name.as_str()), joined);
    }
}

/// Canonical MIME header key form: first letter and every letter following a
/// dash uppercased, the rest lowercased.
fn canonical_header_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if upper_next {
            canonical.extend(c.to_uppercase());
        } else {
            canonical.extend(c.to_lowercase());
        }
        upper_next = c == '-';
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_names() {
        assert_eq!(canonical_header_name("some-header"), "Some-Header");
        assert_eq!(canonical_header_name("content-length"), "Content-Length");
        assert_eq!(canonical_header_name("ACCEPT"), "Accept");
        assert_eq!(canonical_header_name("x"), "X");
    }
}
