//! HTTP/1.x wire-format dumps and frame parsing.
//!
//! This module owns the byte-level half of the codec: producing the literal
//! wire form of a live message (start line, `CRLF`-terminated header lines,
//! blank line, optional body) and parsing such a frame back into a live
//! object with `httparse`.
//!
//! # Framing rules
//!
//! Only HTTP/1.0 and HTTP/1.1 frames are supported. Dumps write the message
//! exactly as the live object describes it: no framing header is injected or
//! rewritten, so a dump is byte-faithful to the object's header map. On the
//! parse side the body length is taken from `Content-Length` when declared
//! (a frame shorter than the declared length is an error, trailing slack is
//! ignored), otherwise the remainder of the frame is the body. Snapshots are
//! produced from complete captures rather than half-read sockets, so the
//! remainder rule keeps round trips exact without mutating anyone's headers.
//!
//! Response frames are interpreted against the method of the originating
//! request: a response to `HEAD` never carries a body, and frames violating
//! that are rejected as a context mismatch. Informational, `204` and `304`
//! responses decode to an empty body regardless of trailing bytes.

use crate::protocol::{BodySource, DecodeError};
use crate::utils::ensure;
use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri, Version};
use httparse::Status;
use std::io::{self, ErrorKind, Write};
use tracing::trace;

/// Maximum number of headers allowed in a frame
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Initial buffer size allocated for a wire dump
const INIT_DUMP_SIZE: usize = 4 * 1024;

/// Produces the full wire dump of a request: request line, header block and body.
pub(crate) fn dump_request<T>(request: &Request<T>, body: &[u8]) -> io::Result<Bytes> {
    let mut buf = dump_request_head_buf(request)?;
    buf.put_slice(body);
    Ok(buf.freeze())
}

/// Produces the head-only wire dump of a request: request line and header block.
pub(crate) fn dump_request_head<T>(request: &Request<T>) -> io::Result<Bytes> {
    Ok(dump_request_head_buf(request)?.freeze())
}

fn dump_request_head_buf<T>(request: &Request<T>) -> io::Result<BytesMut> {
    let mut buf = BytesMut::with_capacity(INIT_DUMP_SIZE);

    let target = request.uri().path_and_query().map_or_else(|| request.uri().path(), |pq| pq.as_str());
    write!(FastWrite(&mut buf), "{} {} {}\r\n", request.method(), target, version_str(request.version())?)?;

    put_header_block(request.headers(), &mut buf);
    Ok(buf)
}

/// Produces the full wire dump of a response: status line, header block and body.
pub(crate) fn dump_response<T>(response: &Response<T>, body: &[u8]) -> io::Result<Bytes> {
    let mut buf = BytesMut::with_capacity(INIT_DUMP_SIZE);

    let status = response.status();
    write!(
        FastWrite(&mut buf),
        "{} {} {}\r\n",
        version_str(response.version())?,
        status.as_str(),
        status.canonical_reason().unwrap_or("")
    )?;

    put_header_block(response.headers(), &mut buf);
    buf.put_slice(body);
    Ok(buf.freeze())
}

fn put_header_block(headers: &HeaderMap, dst: &mut BytesMut) {
    for (header_name, header_value) in headers.iter() {
        dst.put_slice(header_name.as_ref());
        dst.put_slice(b": ");
        dst.put_slice(header_value.as_ref());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

fn version_str(version: Version) -> io::Result<&'static str> {
    match version {
        Version::HTTP_10 => Ok("HTTP/1.0"),
        Version::HTTP_11 => Ok("HTTP/1.1"),
        // only 1.x frames have a textual wire form this codec can speak
        _ => Err(io::Error::from(ErrorKind::Unsupported)),
    }
}

/// Parses a full request frame, including its body.
///
/// # Errors
///
/// Returns `DecodeError` if:
/// - The frame ends inside the start line or header block (an empty input
///   counts as such)
/// - The number of headers exceeds `MAX_HEADER_NUM`, or the header block
///   exceeds `MAX_HEADER_BYTES`
/// - Method, URI, version or a header is malformed
/// - The body is shorter than the declared `Content-Length`
pub(crate) fn parse_request(raw: &[u8]) -> Result<Request<BodySource>, DecodeError> {
    let (mut request, body_offset) = parse_request_parts(raw)?;
    let body = read_body(&raw[body_offset..], declared_length(request.headers())?)?;
    *request.body_mut() = BodySource::buffered(body);
    Ok(request)
}

/// Parses a head-only request frame (request line + header block).
///
/// Anything after the blank line is ignored; the returned request carries an
/// empty body.
pub(crate) fn parse_request_head(raw: &[u8]) -> Result<Request<BodySource>, DecodeError> {
    let (request, _body_offset) = parse_request_parts(raw)?;
    Ok(request)
}

fn parse_request_parts(raw: &[u8]) -> Result<(Request<BodySource>, usize), DecodeError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
    let mut parsed = httparse::Request::new(&mut headers);

    let body_offset = complete_offset(parsed.parse(raw), raw.len())?;
    trace!(body_offset, "parsed request frame header block");

    let method = Method::from_bytes(parsed.method.ok_or(DecodeError::InvalidMethod)?.as_bytes())
        .map_err(|_| DecodeError::InvalidMethod)?;
    let uri: Uri = parsed.path.ok_or(DecodeError::InvalidUri)?.parse().map_err(|_| DecodeError::InvalidUri)?;
    let version = build_version(parsed.version)?;
    let header_map = build_header_map(parsed.headers)?;

    let mut request = Request::new(BodySource::empty());
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.version_mut() = version;
    *request.headers_mut() = header_map;

    Ok((request, body_offset))
}

/// Parses a full response frame against the method of the originating request.
///
/// # Errors
///
/// Returns `DecodeError` under the same framing conditions as
/// [`parse_request`], plus [`DecodeError::ContextMismatch`] when the frame
/// cannot be interpreted against the request context (body bytes in a
/// response to `HEAD`).
pub(crate) fn parse_response(raw: &[u8], context_method: &Method) -> Result<Response<BodySource>, DecodeError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
    let mut parsed = httparse::Response::new(&mut headers);

    let body_offset = complete_offset(parsed.parse(raw), raw.len())?;
    trace!(body_offset, "parsed response frame header block");

    let code = parsed.code.ok_or_else(|| DecodeError::invalid_status("missing status code"))?;
    let status = StatusCode::from_u16(code).map_err(|_| DecodeError::invalid_status(format!("status code {code} out of range")))?;
    let version = build_version(parsed.version)?;
    let header_map = build_header_map(parsed.headers)?;

    let rest = &raw[body_offset..];
    let body = if *context_method == Method::HEAD {
        ensure!(
            rest.is_empty(),
            DecodeError::context_mismatch(format!("response to HEAD carries {} body bytes", rest.len()))
        );
        Bytes::new()
    } else if bodiless_status(status) {
        Bytes::new()
    } else {
        read_body(rest, declared_length(&header_map)?)?
    };

    let mut response = Response::new(BodySource::buffered(body));
    *response.status_mut() = status;
    *response.version_mut() = version;
    *response.headers_mut() = header_map;

    Ok(response)
}

/// Per RFC 9112 these statuses never carry a message body.
fn bodiless_status(status: StatusCode) -> bool {
    status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED
}

fn complete_offset(result: Result<Status<usize>, httparse::Error>, frame_len: usize) -> Result<usize, DecodeError> {
    let parsed_result = result.map_err(|e| match e {
        httparse::Error::TooManyHeaders => DecodeError::too_many_headers(MAX_HEADER_NUM),
        e => DecodeError::invalid_header(e.to_string()),
    });

    match parsed_result? {
        Status::Complete(body_offset) => {
            ensure!(body_offset <= MAX_HEADER_BYTES, DecodeError::too_large_header(body_offset, MAX_HEADER_BYTES));
            Ok(body_offset)
        }
        Status::Partial => {
            ensure!(frame_len <= MAX_HEADER_BYTES, DecodeError::too_large_header(frame_len, MAX_HEADER_BYTES));
            Err(DecodeError::invalid_header("frame ends inside the header block"))
        }
    }
}

fn build_version(version: Option<u8>) -> Result<Version, DecodeError> {
    match version {
        Some(0) => Ok(Version::HTTP_10),
        Some(1) => Ok(Version::HTTP_11),
        // HTTP/2 and HTTP/3 have no 1.x wire form
        other => Err(DecodeError::InvalidVersion(other)),
    }
}

fn build_header_map(headers: &[httparse::Header<'_>]) -> Result<HeaderMap, DecodeError> {
    let mut header_map = HeaderMap::with_capacity(headers.len());
    for header in headers {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|e| DecodeError::invalid_header(e.to_string()))?;
        let value = HeaderValue::from_bytes(header.value).map_err(|e| DecodeError::invalid_header(e.to_string()))?;
        header_map.append(name, value);
    }
    Ok(header_map)
}

fn declared_length(headers: &HeaderMap) -> Result<Option<usize>, DecodeError> {
    let Some(cl_value) = headers.get(http::header::CONTENT_LENGTH) else {
        return Ok(None);
    };

    let cl_str = cl_value.to_str().map_err(|_| DecodeError::invalid_content_length("value can't to_str"))?;
    let length = cl_str
        .trim()
        .parse::<usize>()
        .map_err(|_| DecodeError::invalid_content_length(format!("value {cl_str} is not a valid length")))?;

    Ok(Some(length))
}

fn read_body(rest: &[u8], declared: Option<usize>) -> Result<Bytes, DecodeError> {
    match declared {
        Some(length) => {
            ensure!(rest.len() >= length, DecodeError::truncated_body(length, rest.len()));
            Ok(Bytes::copy_from_slice(&rest[..length]))
        }
        None => Ok(Bytes::copy_from_slice(rest)),
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
