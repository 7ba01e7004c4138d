//! Response side of the codec.
//!
//! A response snapshot embeds a reduced fragment of its originating request:
//! start line and header block only, keyed `raw_without_body`. The response's
//! own `raw` dump already contains the response body, so the request body is
//! never duplicated into it.

use crate::codec::request::encode_request;
use crate::codec::{fill_headers, wire};
use crate::protocol::{DecodeError, EncodeError, Exchange};
use crate::snapshot::{
    CATEGORY_REQUEST, CATEGORY_RESPONSE, FIELD_BODY, FIELD_CONTENT_LENGTH, FIELD_METHOD, FIELD_PATH, FIELD_RAW,
    FIELD_RAW_WITHOUT_BODY, FIELD_STATUS_CODE, Snapshot,
};

/// Captures a live response, together with its originating request, into a
/// [`Snapshot`].
///
/// The originating request is encoded first and reduced: its `body` field is
/// dropped and its raw dump is replaced by a head-only dump stored under
/// `request.raw_without_body`. The response body is drained and replaced
/// exactly as in [`encode_request`], and the `headers` category carries the
/// joined response headers.
///
/// `response.content_length` is the length of the buffered body in bytes,
/// regardless of what any `Content-Length` header claims.
///
/// # Errors
///
/// Returns [`EncodeError::MissingContext`] if the exchange carries no
/// originating request, and [`EncodeError::Io`] under the same conditions as
/// [`encode_request`].
pub fn encode_response(exchange: &mut Exchange) -> Result<Snapshot, EncodeError> {
    let request = exchange.request_mut().ok_or(EncodeError::MissingContext)?;
    let request_snapshot = encode_request(request)?;
    let head = wire::dump_request_head(request)?;

    let mut snapshot = Snapshot::new();
    if let Some(method) = request_snapshot.method() {
        snapshot.insert(CATEGORY_REQUEST, FIELD_METHOD, method);
    }
    if let Some(path) = request_snapshot.path() {
        snapshot.insert(CATEGORY_REQUEST, FIELD_PATH, path);
    }
    snapshot.insert(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY, String::from_utf8_lossy(&head));

    let response = exchange.response_mut();
    let body = response.body_mut().drain()?;
    let raw = wire::dump_response(response, &body)?;

    snapshot.insert(CATEGORY_RESPONSE, FIELD_STATUS_CODE, response.status().as_str());
    snapshot.insert(CATEGORY_RESPONSE, FIELD_CONTENT_LENGTH, body.len().to_string());
    snapshot.insert(CATEGORY_RESPONSE, FIELD_BODY, String::from_utf8_lossy(&body));
    snapshot.insert(CATEGORY_RESPONSE, FIELD_RAW, String::from_utf8_lossy(&raw));

    fill_headers(&mut snapshot, response.headers());

    Ok(snapshot)
}

/// Rebuilds a live response from a [`Snapshot`], against a synthetic
/// originating request.
///
/// `request.raw_without_body` is parsed first as a head-only frame to build
/// the context request; `response.raw` is then parsed against that context,
/// since the request method governs how a response frame's body is
/// interpreted.
///
/// # Errors
///
/// Returns [`DecodeError`] if either raw field is absent or malformed, and
/// [`DecodeError::ContextMismatch`] if the response frame is inconsistent
/// with the synthesized request (body bytes in a response to `HEAD`).
pub fn decode_response(snapshot: &Snapshot) -> Result<Exchange, DecodeError> {
    let head_raw = snapshot
        .request_raw_without_body()
        .ok_or_else(|| DecodeError::missing_field(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY))?;
    let request = wire::parse_request_head(head_raw.as_bytes())?;

    let raw = snapshot.response_raw().ok_or_else(|| DecodeError::missing_field(CATEGORY_RESPONSE, FIELD_RAW))?;
    let response = wire::parse_response(raw.as_bytes(), request.method())?;

    Ok(Exchange::new(request, response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BodySource;
    use crate::snapshot::CATEGORY_HEADERS;
    use bytes::Bytes;
    use http::{Method, Request, Response, StatusCode};

    fn sample_exchange() -> Exchange {
        let request = Request::builder()
            .method("POST")
            .uri("/foo/bar?one=testone")
            .header("Some-Header", "test")
            .body(BodySource::buffered("foo=1&bar=test"))
            .unwrap();

        let response = Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html")
            .body(BodySource::buffered("<html>....</html>"))
            .unwrap();

        Exchange::new(request, response)
    }

    #[test]
    fn encode_captures_response_fields() {
        let mut exchange = sample_exchange();
        let snapshot = encode_response(&mut exchange).unwrap();

        assert_eq!(snapshot.status_code(), Some(200));
        assert_eq!(snapshot.content_length(), Some(17));
        assert_eq!(snapshot.response_body(), Some("<html>....</html>"));
        assert_eq!(snapshot.header_values("Content-Type"), Some(vec!["text/html"]));
        assert!(snapshot.response_raw().unwrap().starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn request_fragment_is_reduced() {
        let mut exchange = sample_exchange();
        let snapshot = encode_response(&mut exchange).unwrap();

        // never a request body, never a full raw dump
        assert_eq!(snapshot.get(CATEGORY_REQUEST, FIELD_BODY), None);
        assert_eq!(snapshot.get(CATEGORY_REQUEST, FIELD_RAW), None);

        let head = snapshot.request_raw_without_body().unwrap();
        assert!(head.starts_with("POST /foo/bar?one=testone HTTP/1.1\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
        assert!(!head.contains("foo=1&bar=test"));

        // the headers category belongs to the response
        assert_eq!(snapshot.header_values("Content-Type"), Some(vec!["text/html"]));
        assert_eq!(snapshot.get(CATEGORY_HEADERS, "Some-Header"), None);
    }

    #[test]
    fn encode_leaves_both_bodies_re_readable() {
        let mut exchange = sample_exchange();
        encode_response(&mut exchange).unwrap();

        let (request, mut response) = exchange.into_parts();
        assert_eq!(request.unwrap().body_mut().drain().unwrap(), Bytes::from_static(b"foo=1&bar=test"));
        assert_eq!(response.body_mut().drain().unwrap(), Bytes::from_static(b"<html>....</html>"));
    }

    #[test]
    fn encode_without_request_context_fails() {
        let response = Response::builder().status(StatusCode::OK).body(BodySource::empty()).unwrap();
        let mut exchange = Exchange::without_request(response);

        let err = encode_response(&mut exchange).unwrap_err();
        assert!(matches!(err, EncodeError::MissingContext));
    }

    #[test]
    fn round_trip_rebuilds_response_and_context() {
        let mut exchange = sample_exchange();
        let snapshot = encode_response(&mut exchange).unwrap();

        let restored = decode_response(&snapshot).unwrap();

        let request = restored.request().unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.uri().path(), "/foo/bar");

        let response = restored.response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_bytes().unwrap(), &Bytes::from_static(b"<html>....</html>"));
    }

    #[test]
    fn decode_without_raw_fields_is_a_missing_field() {
        let snapshot = Snapshot::new();
        let err = decode_response(&snapshot).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { category: "request", field: "raw_without_body" }));

        let mut with_request = Snapshot::new();
        with_request.insert(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY, "GET / HTTP/1.1\r\n\r\n");
        let err = decode_response(&with_request).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { category: "response", field: "raw" }));
    }

    #[test]
    fn decode_detects_head_context_mismatch() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY, "HEAD /page HTTP/1.1\r\n\r\n");
        snapshot.insert(CATEGORY_RESPONSE, FIELD_RAW, "HTTP/1.1 200 OK\r\n\r\nunexpected-body");

        let err = decode_response(&snapshot).unwrap_err();
        assert!(matches!(err, DecodeError::ContextMismatch { .. }));
    }

    #[test]
    fn decode_of_truncated_response_raw_fails() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(CATEGORY_REQUEST, FIELD_RAW_WITHOUT_BODY, "GET / HTTP/1.1\r\n\r\n");
        snapshot.insert(CATEGORY_RESPONSE, FIELD_RAW, "HTTP/1.1 200 OK\r\nContent-Ty");

        let err = decode_response(&snapshot).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHeader { .. }));
    }
}
