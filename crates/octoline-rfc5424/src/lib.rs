//! RFC 5424 syslog message grammar.
//!
//! Parses the header and structured-data section of an IETF syslog message
//! into a [`SyslogMessage`]. Two modes:
//! - strict: the first grammar violation aborts the parse
//! - best effort: the violation is still reported, but every header field
//!   parsed up to that point is returned in a partial message
//!
//! Timestamps are shape-checked against RFC 3339 and stored verbatim; their
//! semantics are left to the consumer. Structured data is captured raw,
//! brackets included, without unescaping.

pub mod error;
pub mod message;
pub mod parser;

pub use error::Rfc5424Error;
pub use message::SyslogMessage;
pub use parser::Rfc5424Parser;
