use serde::Serialize;

/// A parsed RFC 5424 syslog message.
///
/// Header fields that carry the nil value (`-`) on the wire are `None`.
/// The timestamp and structured-data section are stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyslogMessage {
    /// Facility derived from the priority (priority / 8).
    pub facility: Option<u8>,
    /// Severity derived from the priority (priority % 8).
    pub severity: Option<u8>,
    /// Raw priority value, 0-191.
    pub priority: Option<u8>,
    /// Protocol version, 1-999.
    pub version: u16,
    /// RFC 3339 timestamp, verbatim.
    pub timestamp: Option<String>,
    pub hostname: Option<String>,
    pub appname: Option<String>,
    pub procid: Option<String>,
    pub msgid: Option<String>,
    /// Structured-data section, verbatim, brackets included.
    pub structured_data: Option<String>,
    /// Free-form message, lossily decoded as UTF-8.
    pub message: Option<String>,
}

impl SyslogMessage {
    pub(crate) fn set_priority(&mut self, priority: u8) {
        self.priority = Some(priority);
        self.facility = Some(priority >> 3);
        self.severity = Some(priority & 0x07);
    }
}
