use std::io;
use thiserror::Error;

/// Top level error for the snapshot codec, wrapping the encode and decode halves.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("encode error: {source}")]
    Encode {
        #[from]
        source: EncodeError,
    },

    #[error("decode error: {source}")]
    Decode {
        #[from]
        source: DecodeError,
    },
}

/// Errors produced while capturing a live message into a snapshot.
///
/// Encoding never returns a partial snapshot: on error the caller gets
/// nothing and the live object's body stream may already be spent.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("response carries no originating request")]
    MissingContext,
}

/// Errors produced while rebuilding a live message from a snapshot.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("snapshot has no `{category}.{field}` entry")]
    MissingField { category: &'static str, field: &'static str },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("header block too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid http uri")]
    InvalidUri,

    #[error("invalid status line: {reason}")]
    InvalidStatus { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body truncated: declared {expected} bytes, frame carries {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    #[error("context mismatch: {reason}")]
    ContextMismatch { reason: String },
}

impl DecodeError {
    pub fn missing_field(category: &'static str, field: &'static str) -> Self {
        Self::MissingField { category, field }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_status<S: ToString>(str: S) -> Self {
        Self::InvalidStatus { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn truncated_body(expected: usize, actual: usize) -> Self {
        Self::TruncatedBody { expected, actual }
    }

    pub fn context_mismatch<S: ToString>(str: S) -> Self {
        Self::ContextMismatch { reason: str.to_string() }
    }
}
