/// Errors raised by the octet-counting scanner while framing the stream.
///
/// Each of these is reported through the listener as an error-only
/// [`FrameResult`](crate::FrameResult); the scanner then resynchronizes and
/// keeps going. They never abort the stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    /// A byte that is neither a digit nor part of a length prefix appeared
    /// where a length prefix was expected.
    #[error("expecting a digit in the octet counting length prefix, found 0x{found:02x}")]
    ExpectedDigit { found: u8 },

    /// The length prefix was not followed by the single space separator.
    #[error("expecting a space after the octet counting length prefix, found 0x{found:02x}")]
    ExpectedSeparator { found: u8 },

    /// The declared frame length exceeds the configured maximum.
    #[error("declared frame length {length} exceeds the maximum {max}")]
    FrameTooLarge { length: u64, max: usize },

    /// The stream ended while payload bytes were still outstanding.
    #[error("stream ended {missing} bytes short of a declared {declared}-byte frame")]
    Incomplete { declared: usize, missing: usize },

    /// The stream ended in the middle of a length prefix.
    #[error("stream ended inside an octet counting length prefix")]
    TruncatedPrefix,
}

/// The per-frame error slot of a [`FrameResult`](crate::FrameResult).
///
/// Distinguishes transport-framing failures from message-grammar failures
/// reported by the injected parser. I/O errors are not represented here:
/// they abort the scan and surface from the stream entry points directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError<E> {
    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error(transparent)]
    Grammar(E),
}

impl<E> FrameError<E> {
    pub fn is_framing(&self) -> bool {
        matches!(self, FrameError::Framing(_))
    }
}

/// Error returned when a [`ScannerConfig`](crate::ScannerConfig) is rejected
/// at scanner construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfig {
    #[error("max_frame_len must be greater than zero")]
    ZeroMaxFrameLen,
}
