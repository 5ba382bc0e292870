use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use octoline_framing::{TrailerType, DEFAULT_MAX_FRAME_LEN};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod parse;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame a byte stream and parse each message.
    Parse(ParseArgs),
    /// Parse a single message, no framing.
    Check(CheckArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Parse(args) => parse::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FramingMode {
    /// `<len> <payload>` length-prefixed frames.
    OctetCounting,
    /// Trailer-delimited frames starting at `<`.
    NonTransparent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TrailerArg {
    Lf,
    Nul,
}

impl From<TrailerArg> for TrailerType {
    fn from(arg: TrailerArg) -> Self {
        match arg {
            TrailerArg::Lf => TrailerType::Lf,
            TrailerArg::Nul => TrailerType::Nul,
        }
    }
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Input file. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Framing scheme.
    #[arg(long, value_enum, default_value = "octet-counting")]
    pub framing: FramingMode,
    /// Trailer byte (non-transparent framing only).
    #[arg(long, value_enum, default_value = "lf")]
    pub trailer: TrailerArg,
    /// Keep partially parsed messages alongside their grammar errors.
    #[arg(long)]
    pub best_effort: bool,
    /// Largest accepted declared frame length, in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_FRAME_LEN)]
    pub max_frame_len: usize,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The message to parse.
    pub message: String,
    /// Keep the partially parsed message alongside its error.
    #[arg(long)]
    pub best_effort: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
