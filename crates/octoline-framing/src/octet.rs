use std::io::Read;

use bytes::BytesMut;
use octoline_rfc5424::Rfc5424Parser;

use crate::driver::{drive, Scan};
use crate::error::{FrameError, FramingError, InvalidConfig};
use crate::scan::{dispatch, FrameResult, MessageParser, ScannerConfig};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Octet-counting scanner state. The separator space is consumed as the
/// terminating byte of `AwaitingLength`, so no separate awaiting-separator
/// state is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Accumulating the decimal length prefix.
    AwaitingLength { value: u64, digits: u32 },
    /// Copying exactly `remaining` payload bytes, whatever their value.
    ConsumingBody { remaining: usize },
    /// Discarding bytes after a framing error until the next digit run.
    Resync,
}

/// Incremental scanner for RFC 6587 octet-counted streams.
///
/// Wire format: `<decimal-length><SP><payload>`, frames back to back with
/// nothing in between. Payload bytes are copied verbatim; LF, NUL or `<`
/// inside the payload are content, never delimiters.
///
/// A scanner serves exactly one stream: the stream-consuming entry points
/// take `self` by value.
pub struct OctetCountingScanner<P: MessageParser = Rfc5424Parser> {
    parser: P,
    max_frame_len: usize,
    state: ScanState,
    frame: BytesMut,
}

impl OctetCountingScanner<Rfc5424Parser> {
    /// Scanner with the bundled RFC 5424 grammar machine, honoring
    /// `config.best_effort`.
    pub fn new(config: ScannerConfig) -> Result<Self, InvalidConfig> {
        let parser = config.build_default_parser();
        Self::with_parser(config, parser)
    }
}

impl<P: MessageParser> OctetCountingScanner<P> {
    /// Scanner with an injected grammar parser.
    pub fn with_parser(config: ScannerConfig, parser: P) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self {
            parser,
            max_frame_len: config.max_frame_len,
            state: ScanState::AwaitingLength { value: 0, digits: 0 },
            frame: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        })
    }

    /// Feed one chunk, emitting a result per frame completed within it.
    ///
    /// Scanning state persists across calls; chunks may split the stream at
    /// any byte offset.
    pub fn step(
        &mut self,
        chunk: &[u8],
        emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>),
    ) {
        let mut at = 0;
        while at < chunk.len() {
            match self.state {
                ScanState::AwaitingLength { value, digits } => {
                    let byte = chunk[at];
                    if byte.is_ascii_digit() {
                        let next = value
                            .saturating_mul(10)
                            .saturating_add(u64::from(byte - b'0'));
                        if next > self.max_frame_len as u64 {
                            self.framing_error(
                                FramingError::FrameTooLarge {
                                    length: next,
                                    max: self.max_frame_len,
                                },
                                emit,
                            );
                        } else {
                            self.state = ScanState::AwaitingLength {
                                value: next,
                                digits: digits + 1,
                            };
                        }
                    } else if byte == b' ' && digits > 0 {
                        if value == 0 {
                            // Zero-length frames are legal and dispatch empty.
                            dispatch(&mut self.parser, &[], None, emit);
                            self.state = ScanState::AwaitingLength { value: 0, digits: 0 };
                        } else {
                            self.state = ScanState::ConsumingBody {
                                remaining: value as usize,
                            };
                        }
                    } else if digits == 0 {
                        self.framing_error(FramingError::ExpectedDigit { found: byte }, emit);
                    } else {
                        self.framing_error(FramingError::ExpectedSeparator { found: byte }, emit);
                    }
                    at += 1;
                }
                ScanState::ConsumingBody { remaining } => {
                    let take = remaining.min(chunk.len() - at);
                    self.frame.extend_from_slice(&chunk[at..at + take]);
                    at += take;
                    if remaining == take {
                        dispatch(&mut self.parser, &self.frame, None, emit);
                        self.frame.clear();
                        self.state = ScanState::AwaitingLength { value: 0, digits: 0 };
                    } else {
                        self.state = ScanState::ConsumingBody {
                            remaining: remaining - take,
                        };
                    }
                }
                ScanState::Resync => {
                    if chunk[at].is_ascii_digit() {
                        // Next digit run found; it starts a new length prefix.
                        self.state = ScanState::AwaitingLength { value: 0, digits: 0 };
                    } else {
                        at += 1;
                    }
                }
            }
        }
    }

    /// End-of-stream handling: a truncated prefix or body is an incomplete
    /// frame; its bytes are discarded, and a single error-only result
    /// reports the truncation.
    pub fn finish(self, emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        match self.state {
            ScanState::ConsumingBody { remaining } => {
                emit(FrameResult {
                    message: None,
                    error: Some(FrameError::Framing(FramingError::Incomplete {
                        declared: self.frame.len() + remaining,
                        missing: remaining,
                    })),
                });
            }
            ScanState::AwaitingLength { digits, .. } if digits > 0 => {
                emit(FrameResult {
                    message: None,
                    error: Some(FrameError::Framing(FramingError::TruncatedPrefix)),
                });
            }
            _ => {}
        }
    }

    /// Scan a whole stream, invoking `listener` once per frame.
    ///
    /// Returns the read error if the source fails; clean EOF runs
    /// [`finish`](Self::finish) and returns `Ok(())`.
    pub fn run<R: Read>(
        self,
        source: R,
        listener: impl FnMut(FrameResult<P::Message, P::Error>),
    ) -> std::io::Result<()> {
        drive(self, source, listener)
    }

    fn framing_error(
        &mut self,
        error: FramingError,
        emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>),
    ) {
        tracing::debug!(%error, "octet counting framing error, resynchronizing");
        emit(FrameResult {
            message: None,
            error: Some(FrameError::Framing(error)),
        });
        self.frame.clear();
        self.state = ScanState::Resync;
    }
}

impl<P: MessageParser> Scan for OctetCountingScanner<P> {
    type Message = P::Message;
    type Error = P::Error;

    fn step(&mut self, chunk: &[u8], emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        OctetCountingScanner::step(self, chunk, emit)
    }

    fn finish(self, emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        OctetCountingScanner::finish(self, emit)
    }
}
