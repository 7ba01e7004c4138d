//! Request side of the codec.
//!
//! [`encode_request`] captures a live request into a snapshot without
//! destroying it for the caller; [`decode_request`] rebuilds a new live
//! request purely from the snapshot's raw frame.

use crate::codec::{fill_headers, wire};
use crate::protocol::{BodySource, DecodeError, EncodeError};
use crate::snapshot::{
    CATEGORY_QUERY_PARAMS, CATEGORY_REQUEST, FIELD_BODY, FIELD_METHOD, FIELD_PATH, FIELD_RAW, Snapshot,
};
use http::{Request, Uri};
use std::collections::BTreeMap;
use tracing::debug;

/// Captures a live request into a [`Snapshot`].
///
/// The request's one-shot body stream is drained exactly once and replaced
/// with a rewindable buffer over the same bytes, so the caller can still
/// consume the body afterwards. The snapshot holds the full wire dump under
/// `request.raw`, the decoded body text, method and path, plus the joined
/// header and query-parameter tables.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the body cannot be fully read or the wire
/// dump cannot be produced. No partial snapshot is returned.
pub fn encode_request(request: &mut Request<BodySource>) -> Result<Snapshot, EncodeError> {
    let body = request.body_mut().drain()?;
    let raw = wire::dump_request(request, &body)?;

    let mut snapshot = Snapshot::new();
    snapshot.insert(CATEGORY_REQUEST, FIELD_METHOD, request.method().as_str());
    snapshot.insert(CATEGORY_REQUEST, FIELD_PATH, request.uri().path());
    snapshot.insert(CATEGORY_REQUEST, FIELD_BODY, String::from_utf8_lossy(&body));
    snapshot.insert(CATEGORY_REQUEST, FIELD_RAW, String::from_utf8_lossy(&raw));

    fill_headers(&mut snapshot, request.headers());
    fill_query_params(&mut snapshot, request.uri());

    Ok(snapshot)
}

/// Rebuilds a live request from a [`Snapshot`].
///
/// Only `request.raw` is consulted: the frame is parsed as an HTTP/1.x
/// request (the `headers` category is redundant with what the frame embeds
/// and exists for direct field access without re-parsing).
///
/// # Errors
///
/// Returns [`DecodeError`] if `request.raw` is absent or is not a well-formed
/// request frame.
pub fn decode_request(snapshot: &Snapshot) -> Result<Request<BodySource>, DecodeError> {
    let raw = snapshot.request_raw().ok_or_else(|| DecodeError::missing_field(CATEGORY_REQUEST, FIELD_RAW))?;
    wire::parse_request(raw.as_bytes())
}

/// Groups the query string into a name → joined-values table.
///
/// A query string that does not parse as form pairs is skipped rather than
/// failing the whole capture, matching how permissive URL query accessors
/// behave.
fn fill_query_params(snapshot: &mut Snapshot, uri: &Uri) {
    let Some(query) = uri.query() else {
        return;
    };

    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(e) => {
            debug!(cause = %e, "skipping unparseable query string");
            return;
        }
    };

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in pairs {
        grouped.entry(name.trim().to_owned()).or_default().push(value.trim().to_owned());
    }

    for (name, values) in grouped {
        let joined = Snapshot::join_values(values.iter().map(String::as_str));
        snapshot.insert(CATEGORY_QUERY_PARAMS, &name, joined);
    }
}
