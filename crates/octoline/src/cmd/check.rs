use octoline_framing::{FrameError, Rfc5424FrameResult};
use octoline_rfc5424::Rfc5424Parser;

use crate::cmd::CheckArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_result, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let result = check(&args.message, args.best_effort);
    print_result(0, &result, format);
    if result.error.is_some() {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}

fn check(input: &str, best_effort: bool) -> Rfc5424FrameResult {
    let parser = if best_effort {
        Rfc5424Parser::best_effort()
    } else {
        Rfc5424Parser::new()
    };
    let (message, error) = parser.parse(input.as_bytes());
    Rfc5424FrameResult {
        message,
        error: error.map(FrameError::Grammar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_message_has_no_error() {
        let result = check("<34>1 2003-10-11T22:14:15.003Z host app - ID47 - hi", false);
        assert!(result.is_ok());
        assert_eq!(result.message.unwrap().message.as_deref(), Some("hi"));
    }

    #[test]
    fn strict_mode_drops_the_partial_message() {
        let result = check("<2>12 A B C D E -", false);
        assert!(result.message.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn best_effort_keeps_the_partial_message() {
        let result = check("<2>12 A B C D E -", true);
        assert_eq!(result.message.unwrap().version, 12);
        assert!(result.error.is_some());
    }
}
