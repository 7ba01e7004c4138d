//! Live message types and error taxonomy for the snapshot codec.
//!
//! A live request is a plain `http::Request<BodySource>`; a live response is
//! an [`Exchange`], which keeps the originating request attached the way the
//! wire protocol requires for interpretation.
//!
//! - **Body handling** ([`body`]): [`BodySource`], the single-read body
//!   stream with its drain-and-replace contract
//! - **Response context**: [`Exchange`], a response plus its
//!   originating request
//! - **Error handling**: [`SnapshotError`] at the top,
//!   [`EncodeError`] and [`DecodeError`] per direction

pub mod body;
pub use body::BodySource;

mod exchange;
pub use exchange::Exchange;

mod error;
pub use error::DecodeError;
pub use error::EncodeError;
pub use error::SnapshotError;
