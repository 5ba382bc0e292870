use octoline_rfc5424::{Rfc5424Error, Rfc5424Parser, SyslogMessage};

use crate::error::{FrameError, InvalidConfig};
use crate::trailer::TrailerType;

/// Default maximum declared frame length: the conservative RFC 5424
/// transport limit of 8 KiB.
pub const DEFAULT_MAX_FRAME_LEN: usize = 8192;

/// The injected message-grammar seam.
///
/// A scanner hands every completed frame to its parser and wraps whatever
/// comes back into a [`FrameResult`]. Best-effort parsers may return both a
/// (partial) message and an error for the same frame.
pub trait MessageParser {
    type Message;
    type Error: std::error::Error;

    fn parse(&mut self, frame: &[u8]) -> (Option<Self::Message>, Option<Self::Error>);
}

impl MessageParser for Rfc5424Parser {
    type Message = SyslogMessage;
    type Error = Rfc5424Error;

    fn parse(&mut self, frame: &[u8]) -> (Option<SyslogMessage>, Option<Rfc5424Error>) {
        Rfc5424Parser::parse(self, frame)
    }
}

/// One result per completed frame, delivered to the listener in arrival
/// order.
///
/// `message` is absent for pure framing errors and for strict-mode grammar
/// errors; `error` is absent for clean frames. At least one is always
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameResult<M, E> {
    pub message: Option<M>,
    pub error: Option<FrameError<E>>,
}

impl<M, E> FrameResult<M, E> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Results produced with the default RFC 5424 grammar machine.
pub type Rfc5424FrameResult = FrameResult<SyslogMessage, Rfc5424Error>;

/// Scanner configuration.
///
/// An explicit struct built up front and validated at scanner construction;
/// `trailer` only affects the non-transparent scanner, `max_frame_len` only
/// the octet-counting one.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Trailer byte for non-transparent framing.
    pub trailer: TrailerType,
    /// Build the default grammar machine in best-effort mode.
    pub best_effort: bool,
    /// Upper bound on the declared octet-counting frame length.
    pub max_frame_len: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            trailer: TrailerType::Lf,
            best_effort: false,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl ScannerConfig {
    pub(crate) fn validate(&self) -> Result<(), InvalidConfig> {
        if self.max_frame_len == 0 {
            return Err(InvalidConfig::ZeroMaxFrameLen);
        }
        Ok(())
    }

    pub(crate) fn build_default_parser(&self) -> Rfc5424Parser {
        if self.best_effort {
            Rfc5424Parser::best_effort()
        } else {
            Rfc5424Parser::new()
        }
    }
}

/// Frame dispatcher: strip the trailer if one is configured and present,
/// run the grammar parser over the exact byte span, and invoke the listener
/// exactly once.
pub(crate) fn dispatch<P: MessageParser>(
    parser: &mut P,
    buf: &[u8],
    trailer: Option<u8>,
    emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>),
) {
    let frame = match trailer {
        Some(t) if buf.last() == Some(&t) => &buf[..buf.len() - 1],
        _ => buf,
    };
    let (message, error) = parser.parse(frame);
    tracing::trace!(len = frame.len(), ok = error.is_none(), "frame dispatched");
    emit(FrameResult {
        message,
        error: error.map(FrameError::Grammar),
    });
}
