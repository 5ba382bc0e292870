use std::fs::File;
use std::io::Read;

use octoline_framing::{
    NonTransparentScanner, OctetCountingScanner, Rfc5424FrameResult, ScannerConfig,
};

use crate::cmd::{FramingMode, ParseArgs};
use crate::exit::{config_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_result, OutputFormat};

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ScannerConfig {
        trailer: args.trailer.into(),
        best_effort: args.best_effort,
        max_frame_len: args.max_frame_len,
    };

    let (frames, errors) = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("opening {}", path.display()), err))?;
            scan(file, &config, args.framing, |index, result| {
                print_result(index, result, format)
            })?
        }
        None => scan(
            std::io::stdin().lock(),
            &config,
            args.framing,
            |index, result| print_result(index, result, format),
        )?,
    };

    tracing::info!(frames, errors, "stream complete");
    if errors > 0 {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}

/// Scan `source` to exhaustion, handing each frame result to `sink` in
/// stream order. Returns (frames seen, frames with an error).
fn scan<R: Read>(
    source: R,
    config: &ScannerConfig,
    mode: FramingMode,
    mut sink: impl FnMut(usize, &Rfc5424FrameResult),
) -> CliResult<(usize, usize)> {
    let mut frames = 0usize;
    let mut errors = 0usize;
    let mut listener = |result: Rfc5424FrameResult| {
        if result.error.is_some() {
            errors += 1;
        }
        sink(frames, &result);
        frames += 1;
    };

    let outcome = match mode {
        FramingMode::OctetCounting => OctetCountingScanner::new(config.clone())
            .map_err(config_error)?
            .run(source, &mut listener),
        FramingMode::NonTransparent => NonTransparentScanner::new(config.clone())
            .map_err(config_error)?
            .run(source, &mut listener),
    };
    outcome.map_err(|err| io_error("reading stream", err))?;

    Ok((frames, errors))
}
