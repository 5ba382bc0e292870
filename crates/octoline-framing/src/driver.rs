use std::io::{ErrorKind, Read};

use crate::scan::FrameResult;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Chunk-at-a-time scanning surface shared by both framing schemes.
///
/// `step` may suspend mid-frame at any byte offset; `finish` runs the
/// scheme's end-of-stream handling once. Consuming `self` keeps a scanner
/// confined to a single stream.
pub trait Scan: Sized {
    type Message;
    type Error;

    fn step(&mut self, chunk: &[u8], emit: &mut dyn FnMut(FrameResult<Self::Message, Self::Error>));

    fn finish(self, emit: &mut dyn FnMut(FrameResult<Self::Message, Self::Error>));
}

/// Stream driver: pull chunks from the source and feed the scanner until
/// clean EOF or a fatal read error.
///
/// On clean EOF the scanner's completion handling runs once and `Ok(())` is
/// returned. Any non-`Interrupted` read error aborts immediately: no further
/// scanning, no result for whatever was buffered, the error returned
/// out-of-band.
pub fn drive<S, R, F>(mut scanner: S, mut source: R, mut listener: F) -> std::io::Result<()>
where
    S: Scan,
    R: Read,
    F: FnMut(FrameResult<S::Message, S::Error>),
{
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = match source.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        if read == 0 {
            scanner.finish(&mut listener);
            return Ok(());
        }

        scanner.step(&chunk[..read], &mut listener);
    }
}
