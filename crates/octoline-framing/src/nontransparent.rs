use std::io::Read;

use bytes::{BufMut, BytesMut};
use octoline_rfc5424::Rfc5424Parser;

use crate::driver::{drive, Scan};
use crate::error::InvalidConfig;
use crate::scan::{dispatch, FrameResult, MessageParser, ScannerConfig};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Non-transparent scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Skipping resync garbage until the `<` start marker.
    AwaitingStart,
    /// Accumulating frame bytes until the trailer.
    BufferingBody,
}

/// Incremental scanner for RFC 6587 non-transparent (trailer-delimited)
/// streams.
///
/// Every frame begins at `<` (the priority field) and normally ends at the
/// configured trailer byte, which is stripped before the grammar parser sees
/// the frame. The start marker doubles as the resynchronization anchor:
/// bytes before the first `<` are discarded, and a new `<` arriving before
/// any trailer flushes the pending frame rather than corrupting it. Trailer
/// bytes can legitimately occur inside malformed upstream content, so the
/// marker is the more reliable boundary.
///
/// There are no fatal framing errors in this mode; a stream that ends
/// without a final trailer still yields its last frame.
pub struct NonTransparentScanner<P: MessageParser = Rfc5424Parser> {
    parser: P,
    trailer: u8,
    state: ScanState,
    frame: BytesMut,
}

impl NonTransparentScanner<Rfc5424Parser> {
    /// Scanner with the bundled RFC 5424 grammar machine, honoring
    /// `config.best_effort` and `config.trailer`.
    pub fn new(config: ScannerConfig) -> Result<Self, InvalidConfig> {
        let parser = config.build_default_parser();
        Self::with_parser(config, parser)
    }
}

impl<P: MessageParser> NonTransparentScanner<P> {
    /// Scanner with an injected grammar parser.
    ///
    /// The trailer byte is resolved from the config once, here.
    pub fn with_parser(config: ScannerConfig, parser: P) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self {
            parser,
            trailer: config.trailer.as_byte(),
            state: ScanState::AwaitingStart,
            frame: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        })
    }

    /// Feed one chunk, emitting a result per frame completed within it.
    pub fn step(
        &mut self,
        chunk: &[u8],
        emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>),
    ) {
        for &byte in chunk {
            match self.state {
                ScanState::AwaitingStart => {
                    if byte == b'<' {
                        self.begin_frame(emit);
                    } else {
                        // Resync garbage; never dispatched.
                        tracing::trace!(byte, "skipping byte while awaiting start marker");
                    }
                }
                ScanState::BufferingBody => {
                    if byte == b'<' {
                        // A start marker without an intervening trailer: the
                        // pending frame is complete as far as we will ever
                        // know, so flush it and restart.
                        self.begin_frame(emit);
                    } else {
                        self.frame.put_u8(byte);
                        if byte == self.trailer {
                            dispatch(&mut self.parser, &self.frame, Some(self.trailer), emit);
                            self.frame.clear();
                            self.state = ScanState::AwaitingStart;
                        }
                    }
                }
            }
        }
    }

    /// End-of-stream handling: a pending trailerless frame is flushed and
    /// parsed normally. Truncation is not an error in this mode.
    pub fn finish(mut self, emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        if !self.frame.is_empty() {
            dispatch(&mut self.parser, &self.frame, Some(self.trailer), emit);
        }
    }

    /// Scan a whole stream, invoking `listener` once per frame.
    pub fn run<R: Read>(
        self,
        source: R,
        listener: impl FnMut(FrameResult<P::Message, P::Error>),
    ) -> std::io::Result<()> {
        drive(self, source, listener)
    }

    fn begin_frame(&mut self, emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        if !self.frame.is_empty() {
            dispatch(&mut self.parser, &self.frame, Some(self.trailer), emit);
            self.frame.clear();
        }
        self.frame.put_u8(b'<');
        self.state = ScanState::BufferingBody;
    }
}

impl<P: MessageParser> Scan for NonTransparentScanner<P> {
    type Message = P::Message;
    type Error = P::Error;

    fn step(&mut self, chunk: &[u8], emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        NonTransparentScanner::step(self, chunk, emit)
    }

    fn finish(self, emit: &mut dyn FnMut(FrameResult<P::Message, P::Error>)) {
        NonTransparentScanner::finish(self, emit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trailer::TrailerType;
    use crate::Rfc5424FrameResult;

    fn collect(input: &[u8], config: ScannerConfig) -> Vec<Rfc5424FrameResult> {
        let mut scanner = NonTransparentScanner::new(config).unwrap();
        let mut results = Vec::new();
        scanner.step(input, &mut |res| results.push(res));
        scanner.finish(&mut |res| results.push(res));
        results
    }

    fn nul_config() -> ScannerConfig {
        ScannerConfig {
            trailer: TrailerType::Nul,
            ..ScannerConfig::default()
        }
    }

    #[test]
    fn two_lf_frames() {
        let results = collect(
            b"<1>1 - - - - - -\n<2>12 - - - - - -\n",
            ScannerConfig::default(),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].message.as_ref().unwrap().version, 1);
        assert_eq!(results[1].message.as_ref().unwrap().version, 12);
        assert!(results.iter().all(Rfc5424FrameResult::is_ok));
    }

    #[test]
    fn trailer_never_reaches_the_parser() {
        let mut scanner =
            NonTransparentScanner::with_parser(ScannerConfig::default(), FrameRecorder::default())
                .unwrap();
        let mut frames = Vec::new();
        scanner.step(b"<1>1 a\n<1>1 b\n", &mut |res: FrameResult<
            Vec<u8>,
            std::convert::Infallible,
        >| {
            frames.push(res.message.unwrap())
        });
        assert_eq!(frames, vec![b"<1>1 a".to_vec(), b"<1>1 b".to_vec()]);
    }

    #[test]
    fn leading_garbage_is_skipped() {
        let results = collect(b"garbage<1>1 - - - - - -\n", ScannerConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message.as_ref().unwrap().version, 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn final_frame_without_trailer_is_flushed() {
        let results = collect(b"<1>1 - - - - - -", ScannerConfig::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
        assert_eq!(results[0].message.as_ref().unwrap().version, 1);
    }

    #[test]
    fn nul_trailer() {
        let results = collect(b"<1>1 - - - - - -\x00<3>1 - - - - - -\x00", nul_config());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].message.as_ref().unwrap().priority, Some(1));
        assert_eq!(results[1].message.as_ref().unwrap().priority, Some(3));
    }

    #[test]
    fn lf_is_content_under_nul_trailer() {
        let mut scanner =
            NonTransparentScanner::with_parser(nul_config(), FrameRecorder::default()).unwrap();
        let mut frames = Vec::new();
        scanner.step(b"<1>1 a\nb\x00", &mut |res: FrameResult<
            Vec<u8>,
            std::convert::Infallible,
        >| {
            frames.push(res.message.unwrap())
        });
        // The LF stays in the frame; only the NUL delimits.
        assert_eq!(frames, vec![b"<1>1 a\nb".to_vec()]);
    }

    #[test]
    fn start_marker_without_trailer_flushes_pending_frame() {
        let results = collect(
            b"<1>1 - - - - - -<2>1 - - - - - -\n",
            ScannerConfig::default(),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].message.as_ref().unwrap().priority, Some(1));
        assert_eq!(results[1].message.as_ref().unwrap().priority, Some(2));
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let results = collect(b"", ScannerConfig::default());
        assert!(results.is_empty());

        let results = collect(b"no start marker here", ScannerConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn chunk_invariance() {
        let input = b"garbage<1>1 - - - - - -\n<2>12 A B C D E -\n<3>1 - - - - - -";
        let config = ScannerConfig {
            best_effort: true,
            ..ScannerConfig::default()
        };

        let whole = collect(input, config.clone());
        assert_eq!(whole.len(), 3);

        for split in 1..input.len() {
            let mut scanner = NonTransparentScanner::new(config.clone()).unwrap();
            let mut results = Vec::new();
            scanner.step(&input[..split], &mut |res| results.push(res));
            scanner.step(&input[split..], &mut |res| results.push(res));
            scanner.finish(&mut |res| results.push(res));
            assert_eq!(results, whole, "split at byte {split}");
        }
    }

    #[test]
    fn run_over_reader() {
        let input: &[u8] = b"<1>1 - - - - - -\n<3>1 - - - - - -\n";
        let scanner = NonTransparentScanner::new(ScannerConfig::default()).unwrap();
        let mut results = Vec::new();
        scanner
            .run(std::io::Cursor::new(input), |res| results.push(res))
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Rfc5424FrameResult::is_ok));
    }

    #[derive(Default)]
    struct FrameRecorder;

    impl MessageParser for FrameRecorder {
        type Message = Vec<u8>;
        type Error = std::convert::Infallible;

        fn parse(&mut self, frame: &[u8]) -> (Option<Vec<u8>>, Option<Self::Error>) {
            (Some(frame.to_vec()), None)
        }
    }
}
