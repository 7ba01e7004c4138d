//! Support crate for the wiremap tools.
//!
//! Two small, single-purpose collaborators:
//!
//! - [`fs`]: "create missing parent directories, then open/write" file
//!   helpers
//! - [`log`]: leveled logging setup over `tracing`, with optional plain or
//!   JSON console and file sinks

pub mod fs;
pub mod log;
