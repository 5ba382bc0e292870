mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "octoline", version, about = "Syslog stream framing CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::FramingMode;

    #[test]
    fn parses_parse_subcommand() {
        let cli = Cli::try_parse_from([
            "octoline",
            "parse",
            "stream.bin",
            "--framing",
            "non-transparent",
            "--trailer",
            "nul",
            "--best-effort",
        ])
        .expect("parse args should parse");

        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.framing, FramingMode::NonTransparent);
                assert!(args.best_effort);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_defaults_to_octet_counting_over_stdin() {
        let cli = Cli::try_parse_from(["octoline", "parse"]).expect("bare parse should parse");

        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.framing, FramingMode::OctetCounting);
                assert!(args.file.is_none());
                assert_eq!(args.max_frame_len, octoline_framing::DEFAULT_MAX_FRAME_LEN);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from(["octoline", "check", "<1>1 - - - - - -"])
            .expect("check args should parse");
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn rejects_unknown_framing_mode() {
        let err = Cli::try_parse_from(["octoline", "parse", "--framing", "newline"])
            .expect_err("unknown framing mode should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
