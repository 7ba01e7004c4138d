//! A bidirectional codec between live HTTP messages and flat snapshots
//!
//! This crate converts a live HTTP/1.x request or response object into a
//! flat, string-keyed map — a [`Snapshot`](snapshot::Snapshot) — and back,
//! preserving enough information to reconstruct a semantically equivalent
//! message. A snapshot is self-contained and serializable: it can be stored,
//! logged or transmitted, and decoded later with no dependency on the
//! original connection.
//!
//! # Features
//!
//! - Byte-exact wire capture of the HTTP/1.x frame (start line, header
//!   block, body) under `request.raw` / `response.raw`
//! - Non-destructive encoding: single-read body streams are drained once and
//!   replaced with a rewindable buffer, so the live object stays usable
//! - Multi-valued headers and query parameters collapsed into single string
//!   values without losing enumerability
//! - Response snapshots embed a reduced (head-only) fragment of their
//!   originating request
//! - Clean error taxonomy: I/O failures at encode time, parse failures and
//!   context mismatches at decode time
//!
//! # Example
//!
//! ```
//! use http::Request;
//! use wiremap::protocol::BodySource;
//! use wiremap::{decode_request, encode_request};
//!
//! # fn main() -> Result<(), wiremap::protocol::SnapshotError> {
//! let mut request = Request::builder()
//!     .method("GET")
//!     .uri("/foo/bar?one=testone&two=testtwo")
//!     .header("Some-Header", "test")
//!     .body(BodySource::empty())
//!     .unwrap();
//!
//! let snapshot = encode_request(&mut request)?;
//! assert_eq!(snapshot.method(), Some("GET"));
//! assert_eq!(snapshot.path(), Some("/foo/bar"));
//! assert_eq!(snapshot.query_param_values("one"), Some(vec!["testone"]));
//!
//! let restored = decode_request(&snapshot)?;
//! assert_eq!(restored.uri().path(), "/foo/bar");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`snapshot`]: the two-level, string-only map representation
//! - [`protocol`]: live message types ([`BodySource`](protocol::BodySource),
//!   [`Exchange`](protocol::Exchange)) and the error taxonomy
//! - [`codec`]: the four operations — [`encode_request`], [`decode_request`],
//!   [`encode_response`], [`decode_response`] — and the HTTP/1.x framing
//!   they share
//!
//! # Concurrency
//!
//! The codec is a pure, stateless transformation. Encoding takes `&mut` on
//! the live object because it drains and replaces the body stream; callers
//! holding a shared object must serialize encode calls, which the borrow
//! checker enforces for free. Decoding allocates new objects from immutable
//! snapshot data and may run in parallel without coordination.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 frames only
//! - Maximum header size: 8KB; maximum number of headers: 64
//! - The multi-value separator is a heuristic: snapshot values containing
//!   the ASCII unit separator would split incorrectly
//! - Non-UTF-8 body bytes are captured lossily, since snapshot values are
//!   strings

pub mod codec;
pub mod protocol;
pub mod snapshot;

mod utils;

pub use codec::decode_request;
pub use codec::decode_response;
pub use codec::encode_request;
pub use codec::encode_response;
