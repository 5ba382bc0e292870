//! RFC 6587 syslog transport framing.
//!
//! A TCP byte stream carrying syslog traffic has no alignment between read
//! boundaries and message boundaries. This crate reconstructs individual
//! message frames from arbitrarily chunked input with either of the two
//! RFC 6587 schemes:
//!
//! - **Octet counting** ([`OctetCountingScanner`]): every frame starts with
//!   its decimal byte length, a space, then exactly that many payload bytes.
//! - **Non-transparent framing** ([`NonTransparentScanner`]): every frame
//!   starts at a `<` (the priority field) and ends at a trailer byte, LF by
//!   default or NUL if configured.
//!
//! Both scanners suspend at any byte offset and resume on the next chunk
//! without reprocessing, isolate failures per frame, and hand each completed
//! frame to an injected [`MessageParser`] (the bundled RFC 5424 machine by
//! default). One [`FrameResult`] is delivered to the listener per frame, in
//! arrival order, on the calling thread.

pub mod driver;
pub mod error;
pub mod nontransparent;
pub mod octet;
pub mod scan;
pub mod trailer;

pub use error::{FrameError, FramingError, InvalidConfig};
pub use nontransparent::NonTransparentScanner;
pub use octet::OctetCountingScanner;
pub use scan::{FrameResult, MessageParser, Rfc5424FrameResult, ScannerConfig, DEFAULT_MAX_FRAME_LEN};
pub use trailer::{ParseTrailerTypeError, TrailerType};
