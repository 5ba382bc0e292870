/// Errors raised while parsing an RFC 5424 message.
///
/// Every variant carries the zero-based byte offset (`col`) at which the
/// offending field starts, so diagnostics can point into the raw frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rfc5424Error {
    /// The priority field is missing or not `<0-191>`.
    #[error("expecting a priority value within angle brackets [col {col}]")]
    Priority { col: usize },

    /// The version field is missing or outside 1-999.
    #[error("expecting a version value in the range 1-999 [col {col}]")]
    Version { col: usize },

    /// The timestamp is neither `-` nor shaped like RFC 3339.
    #[error("expecting a RFC3339 timestamp or a nil value [col {col}]")]
    Timestamp { col: usize },

    /// The hostname is empty, too long, or not printable US-ASCII.
    #[error("expecting a hostname (from 1 to 255 US-ASCII characters) or a nil value [col {col}]")]
    Hostname { col: usize },

    /// The app-name is empty, too long, or not printable US-ASCII.
    #[error("expecting an app-name (from 1 to 48 US-ASCII characters) or a nil value [col {col}]")]
    Appname { col: usize },

    /// The procid is empty, too long, or not printable US-ASCII.
    #[error("expecting a procid (from 1 to 128 US-ASCII characters) or a nil value [col {col}]")]
    ProcId { col: usize },

    /// The msgid is empty, too long, or not printable US-ASCII.
    #[error("expecting a msgid (from 1 to 32 US-ASCII characters) or a nil value [col {col}]")]
    MsgId { col: usize },

    /// The structured-data section is neither `-` nor bracketed elements.
    #[error("expecting a structured data section or a nil value [col {col}]")]
    StructuredData { col: usize },

    /// The message ended before the header was complete.
    #[error("unexpected end of message [col {col}]")]
    Incomplete { col: usize },
}

impl Rfc5424Error {
    /// Zero-based byte offset of the failure.
    pub fn col(&self) -> usize {
        match *self {
            Rfc5424Error::Priority { col }
            | Rfc5424Error::Version { col }
            | Rfc5424Error::Timestamp { col }
            | Rfc5424Error::Hostname { col }
            | Rfc5424Error::Appname { col }
            | Rfc5424Error::ProcId { col }
            | Rfc5424Error::MsgId { col }
            | Rfc5424Error::StructuredData { col }
            | Rfc5424Error::Incomplete { col } => col,
        }
    }
}
