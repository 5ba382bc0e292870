use std::fmt;
use std::str::FromStr;

/// The delimiter byte terminating a non-transparent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailerType {
    /// Line feed, 0x0A. The common choice.
    #[default]
    Lf,
    /// NUL, 0x00. Seen from some legacy senders.
    Nul,
}

impl TrailerType {
    /// The concrete byte value on the wire.
    pub const fn as_byte(self) -> u8 {
        match self {
            TrailerType::Lf => 0x0A,
            TrailerType::Nul => 0x00,
        }
    }

    /// Map a wire byte back to a trailer type, if it is one.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x0A => Some(TrailerType::Lf),
            0x00 => Some(TrailerType::Nul),
            _ => None,
        }
    }
}

impl fmt::Display for TrailerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailerType::Lf => f.write_str("lf"),
            TrailerType::Nul => f.write_str("nul"),
        }
    }
}

/// Error returned when a trailer type string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trailer type {0:?} (expected \"lf\" or \"nul\")")]
pub struct ParseTrailerTypeError(pub String);

impl FromStr for TrailerType {
    type Err = ParseTrailerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(TrailerType::Lf),
            "nul" => Ok(TrailerType::Nul),
            other => Err(ParseTrailerTypeError(other.to_string())),
        }
    }
}
