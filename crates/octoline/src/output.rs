use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use octoline_framing::Rfc5424FrameResult;
use octoline_rfc5424::SyslogMessage;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResultOutput<'a> {
    frame: usize,
    message: Option<&'a SyslogMessage>,
    error: Option<String>,
}

/// Print one frame result to stdout.
pub fn print_result(index: usize, result: &Rfc5424FrameResult, format: OutputFormat) {
    let error = result.error.as_ref().map(ToString::to_string);
    match format {
        OutputFormat::Json => {
            let out = ResultOutput {
                frame: index,
                message: result.message.as_ref(),
                error,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "PRI", "VERSION", "HOSTNAME", "MESSAGE", "ERROR"])
                .add_row(vec![
                    index.to_string(),
                    field(result.message.as_ref().and_then(|m| m.priority.map(|p| p.to_string()))),
                    field(result.message.as_ref().map(|m| m.version.to_string())),
                    field(result.message.as_ref().and_then(|m| m.hostname.clone())),
                    field(result.message.as_ref().and_then(|m| m.message.clone())),
                    error.unwrap_or_default(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            match (&result.message, &error) {
                (Some(msg), None) => println!("frame={index} {}", summarize(msg)),
                (Some(msg), Some(err)) => {
                    println!("frame={index} {} error={err}", summarize(msg))
                }
                (None, Some(err)) => println!("frame={index} error={err}"),
                (None, None) => println!("frame={index} <empty result>"),
            }
        }
    }
}

fn summarize(msg: &SyslogMessage) -> String {
    format!(
        "pri={} version={} host={} msg={}",
        msg.priority.map_or_else(|| "-".into(), |p| p.to_string()),
        msg.version,
        msg.hostname.as_deref().unwrap_or("-"),
        msg.message.as_deref().unwrap_or("-"),
    )
}

fn field(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_handles_nil_fields() {
        let msg = SyslogMessage {
            version: 1,
            ..SyslogMessage::default()
        };
        assert_eq!(summarize(&msg), "pri=- version=1 host=- msg=-");
    }
}
