//! Single-read body streams and their buffered replacements.
//!
//! A live HTTP message owns its body as a [`BodySource`]: either a one-shot
//! reader that can be consumed exactly once, or an in-memory buffer that can
//! be read any number of times.
//!
//! Encoding a message must observe the body without destroying it for the
//! caller. [`BodySource::drain`] implements that contract as an explicit
//! take-and-replace: the source is moved out, read to the end, and a buffered
//! copy of the same bytes is installed in its place before the call returns.
//! A second drain (by a later encode or by the caller itself) sees the full
//! original content.
//!
//! # Example
//!
//! ```
//! use wiremap::protocol::BodySource;
//!
//! let mut body = BodySource::from_reader(&b"foo=1&bar=test"[..]);
//!
//! let first = body.drain().unwrap();
//! let second = body.drain().unwrap();
//! assert_eq!(first, second);
//! ```

use bytes::Bytes;
use std::fmt;
use std::io::{self, Read};
use std::mem;

/// An owned body stream: one-shot reader or rewindable buffer.
pub enum BodySource {
    /// A reader that yields its bytes exactly once.
    Once(Box<dyn Read + Send>),
    /// An in-memory buffer; draining it is a cheap clone.
    Buffered(Bytes),
}

impl BodySource {
    /// Creates an empty, already-buffered body.
    pub fn empty() -> Self {
        Self::Buffered(Bytes::new())
    }

    /// Creates a rewindable body over the given bytes.
    pub fn buffered(bytes: impl Into<Bytes>) -> Self {
        Self::Buffered(bytes.into())
    }

    /// Wraps a one-shot reader.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::Once(Box::new(reader))
    }

    /// Reads the whole body and replaces this source with a buffered copy.
    ///
    /// Takes the current source out, drains it, installs a [`Buffered`]
    /// source over the same bytes, and returns those bytes. Draining an
    /// already buffered source just clones the buffer.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`io::Error`] if a one-shot reader fails before
    /// the end of the stream. The reader is consumed either way: after a
    /// failed drain this source is left empty.
    ///
    /// [`Buffered`]: BodySource::Buffered
    pub fn drain(&mut self) -> io::Result<Bytes> {
        match mem::replace(self, Self::Buffered(Bytes::new())) {
            Self::Buffered(bytes) => {
                *self = Self::Buffered(bytes.clone());
                Ok(bytes)
            }
            Self::Once(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                let bytes = Bytes::from(buf);
                *self = Self::Buffered(bytes.clone());
                Ok(bytes)
            }
        }
    }

    /// Returns true if the body has already been buffered.
    #[inline]
    pub fn is_buffered(&self) -> bool {
        matches!(self, Self::Buffered(_))
    }

    /// Returns the buffered bytes, or `None` if the body is still a one-shot reader.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Buffered(bytes) => Some(bytes),
            Self::Once(_) => None,
        }
    }
}

impl Default for BodySource {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for BodySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once(_) => f.write_str("BodySource::Once(..)"),
            Self::Buffered(bytes) => f.debug_tuple("BodySource::Buffered").field(&bytes.len()).finish(),
        }
    }
}

impl From<Bytes> for BodySource {
    fn from(bytes: Bytes) -> Self {
        Self::Buffered(bytes)
    }
}

impl From<Vec<u8>> for BodySource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffered(bytes.into())
    }
}

impl From<String> for BodySource {
    fn from(s: String) -> Self {
        Self::Buffered(s.into())
    }
}

impl From<&'static str> for BodySource {
    fn from(s: &'static str) -> Self {
        Self::Buffered(Bytes::from_static(s.as_bytes()))
    }
}
