use crate::error::Rfc5424Error;
use crate::message::SyslogMessage;

const MAX_PRIORITY: u16 = 191;
const MAX_VERSION: u16 = 999;
const MAX_HOSTNAME_LEN: usize = 255;
const MAX_APPNAME_LEN: usize = 48;
const MAX_PROCID_LEN: usize = 128;
const MAX_MSGID_LEN: usize = 32;

/// UTF-8 byte order mark allowed before the free-form message.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// RFC 5424 grammar machine.
///
/// In best-effort mode a grammar violation still yields the partially
/// populated message alongside the error; in strict mode only the error is
/// returned.
#[derive(Debug, Clone)]
pub struct Rfc5424Parser {
    best_effort: bool,
}

impl Default for Rfc5424Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Rfc5424Parser {
    /// Strict parser: any grammar violation discards the message.
    pub fn new() -> Self {
        Self { best_effort: false }
    }

    /// Best-effort parser: violations are reported next to a partial message.
    pub fn best_effort() -> Self {
        Self { best_effort: true }
    }

    pub fn has_best_effort(&self) -> bool {
        self.best_effort
    }

    /// Parse one complete message.
    ///
    /// Returns the message and/or the first grammar violation encountered.
    /// At least one of the two is always present.
    pub fn parse(&self, input: &[u8]) -> (Option<SyslogMessage>, Option<Rfc5424Error>) {
        let mut msg = SyslogMessage::default();
        match parse_into(input, &mut msg) {
            Ok(()) => (Some(msg), None),
            Err(err) if self.best_effort => (Some(msg), Some(err)),
            Err(err) => (None, Some(err)),
        }
    }
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn take_while(&mut self, keep: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !keep(byte) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }
}

fn parse_into(input: &[u8], msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    let mut cur = Cursor { input, pos: 0 };

    parse_priority(&mut cur, msg)?;
    parse_version(&mut cur, msg)?;
    parse_timestamp(&mut cur, msg)?;
    msg.hostname = parse_header_field(&mut cur, MAX_HOSTNAME_LEN, |col| {
        Rfc5424Error::Hostname { col }
    })?;
    msg.appname = parse_header_field(&mut cur, MAX_APPNAME_LEN, |col| {
        Rfc5424Error::Appname { col }
    })?;
    msg.procid = parse_header_field(&mut cur, MAX_PROCID_LEN, |col| {
        Rfc5424Error::ProcId { col }
    })?;
    msgid(&mut cur, msg)?;
    parse_structured_data(&mut cur, msg)?;
    parse_free_form(&mut cur, msg)
}

fn parse_priority(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    if cur.bump() != Some(b'<') {
        return Err(Rfc5424Error::Priority { col: 0 });
    }
    let start = cur.pos;
    let digits = cur.take_while(|b| b.is_ascii_digit());
    if digits.is_empty() || digits.len() > 3 {
        return Err(Rfc5424Error::Priority { col: start });
    }
    let value = decimal(digits);
    if value > MAX_PRIORITY {
        return Err(Rfc5424Error::Priority { col: start });
    }
    if cur.bump() != Some(b'>') {
        return Err(Rfc5424Error::Priority { col: cur.pos.saturating_sub(1) });
    }
    msg.set_priority(value as u8);
    Ok(())
}

fn parse_version(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    let start = cur.pos;
    let digits = cur.take_while(|b| b.is_ascii_digit());
    if digits.is_empty() || digits.len() > 3 || digits[0] == b'0' {
        return Err(Rfc5424Error::Version { col: start });
    }
    let value = decimal(digits);
    debug_assert!(value >= 1 && value <= MAX_VERSION);
    msg.version = value;
    Ok(())
}

fn parse_timestamp(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    let start = expect_sp(cur, |col| Rfc5424Error::Timestamp { col })?;
    if cur.peek() == Some(b'-') {
        cur.bump();
        return match cur.peek() {
            None | Some(b' ') => Ok(()),
            Some(_) => Err(Rfc5424Error::Timestamp { col: start }),
        };
    }
    let token = cur.take_while(|b| b != b' ');
    if !is_rfc3339_shaped(token) {
        return Err(Rfc5424Error::Timestamp { col: start });
    }
    // Shape-checked above; guaranteed ASCII.
    msg.timestamp = Some(String::from_utf8_lossy(token).into_owned());
    Ok(())
}

fn parse_header_field(
    cur: &mut Cursor<'_>,
    max_len: usize,
    err: impl Fn(usize) -> Rfc5424Error,
) -> Result<Option<String>, Rfc5424Error> {
    let start = expect_sp(cur, &err)?;
    if cur.peek() == Some(b'-') {
        cur.bump();
        match cur.peek() {
            None | Some(b' ') => return Ok(None),
            // A value may legitimately start with '-'; rewind and re-read.
            Some(_) => cur.pos = start,
        }
    }
    let token = cur.take_while(|b| b != b' ');
    if token.is_empty() || token.len() > max_len || !token.iter().all(|b| is_print_us_ascii(*b)) {
        return Err(err(start));
    }
    Ok(Some(String::from_utf8_lossy(token).into_owned()))
}

fn msgid(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    msg.msgid = parse_header_field(cur, MAX_MSGID_LEN, |col| Rfc5424Error::MsgId { col })?;
    Ok(())
}

fn parse_structured_data(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    let start = expect_sp(cur, |col| Rfc5424Error::StructuredData { col })?;
    match cur.peek() {
        Some(b'-') => {
            cur.bump();
            match cur.peek() {
                None | Some(b' ') => Ok(()),
                Some(_) => Err(Rfc5424Error::StructuredData { col: start }),
            }
        }
        Some(b'[') => {
            loop {
                cur.bump(); // consume '['
                let mut prev = b'[';
                loop {
                    match cur.bump() {
                        Some(b']') if prev != b'\\' => break,
                        Some(byte) => prev = byte,
                        None => return Err(Rfc5424Error::Incomplete { col: start }),
                    }
                }
                if cur.peek() != Some(b'[') {
                    break;
                }
            }
            let raw = &cur.input[start..cur.pos];
            msg.structured_data = Some(String::from_utf8_lossy(raw).into_owned());
            Ok(())
        }
        _ => Err(Rfc5424Error::StructuredData { col: start }),
    }
}

fn parse_free_form(cur: &mut Cursor<'_>, msg: &mut SyslogMessage) -> Result<(), Rfc5424Error> {
    if cur.eof() {
        return Ok(());
    }
    if cur.bump() != Some(b' ') {
        return Err(Rfc5424Error::StructuredData { col: cur.pos.saturating_sub(1) });
    }
    let mut rest = cur.rest();
    if rest.starts_with(&BOM) {
        rest = &rest[BOM.len()..];
    }
    msg.message = Some(String::from_utf8_lossy(rest).into_owned());
    Ok(())
}

/// Consume the single SP that precedes every header field.
///
/// Returns the column at which the field value starts.
fn expect_sp(
    cur: &mut Cursor<'_>,
    err: impl Fn(usize) -> Rfc5424Error,
) -> Result<usize, Rfc5424Error> {
    match cur.peek() {
        Some(b' ') => {
            cur.bump();
            if cur.eof() {
                Err(Rfc5424Error::Incomplete { col: cur.pos })
            } else {
                Ok(cur.pos)
            }
        }
        Some(_) => Err(err(cur.pos)),
        None => Err(Rfc5424Error::Incomplete { col: cur.pos }),
    }
}

fn decimal(digits: &[u8]) -> u16 {
    digits
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
}

fn is_print_us_ascii(byte: u8) -> bool {
    (33..=126).contains(&byte)
}

/// Shape check for `YYYY-MM-DDTHH:MM:SS[.frac](Z|±HH:MM)`.
///
/// Field ranges (month 13, leap seconds, ...) are deliberately not checked;
/// timestamp semantics belong to the consumer.
fn is_rfc3339_shaped(t: &[u8]) -> bool {
    fn digits(t: &[u8], range: std::ops::Range<usize>) -> bool {
        t[range].iter().all(u8::is_ascii_digit)
    }

    if t.len() < 20 {
        return false;
    }
    let date_time = digits(t, 0..4)
        && t[4] == b'-'
        && digits(t, 5..7)
        && t[7] == b'-'
        && digits(t, 8..10)
        && t[10] == b'T'
        && digits(t, 11..13)
        && t[13] == b':'
        && digits(t, 14..16)
        && t[16] == b':'
        && digits(t, 17..19);
    if !date_time {
        return false;
    }

    let mut idx = 19;
    if t[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < t.len() && t[idx].is_ascii_digit() {
            idx += 1;
        }
        let frac_len = idx - frac_start;
        if frac_len == 0 || frac_len > 6 {
            return false;
        }
    }

    match t.get(idx) {
        Some(b'Z') => idx + 1 == t.len(),
        Some(b'+') | Some(b'-') => {
            idx + 6 == t.len()
                && t[idx + 1].is_ascii_digit()
                && t[idx + 2].is_ascii_digit()
                && t[idx + 3] == b':'
                && t[idx + 4].is_ascii_digit()
                && t[idx + 5].is_ascii_digit()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(input: &str) -> (Option<SyslogMessage>, Option<Rfc5424Error>) {
        Rfc5424Parser::new().parse(input.as_bytes())
    }

    fn lenient(input: &str) -> (Option<SyslogMessage>, Option<Rfc5424Error>) {
        Rfc5424Parser::best_effort().parse(input.as_bytes())
    }

    #[test]
    fn full_message() {
        let (msg, err) = strict(
            "<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - 'su root' failed",
        );
        assert!(err.is_none());
        let msg = msg.unwrap();
        assert_eq!(msg.priority, Some(34));
        assert_eq!(msg.facility, Some(4));
        assert_eq!(msg.severity, Some(2));
        assert_eq!(msg.version, 1);
        assert_eq!(msg.timestamp.as_deref(), Some("2003-10-11T22:14:15.003Z"));
        assert_eq!(msg.hostname.as_deref(), Some("mymachine.example.com"));
        assert_eq!(msg.appname.as_deref(), Some("su"));
        assert_eq!(msg.procid, None);
        assert_eq!(msg.msgid.as_deref(), Some("ID47"));
        assert_eq!(msg.structured_data, None);
        assert_eq!(msg.message.as_deref(), Some("'su root' failed"));
    }

    #[test]
    fn all_nil_header() {
        let (msg, err) = strict("<1>1 - - - - - -");
        assert!(err.is_none());
        let msg = msg.unwrap();
        assert_eq!(msg.priority, Some(1));
        assert_eq!(msg.version, 1);
        assert_eq!(msg.timestamp, None);
        assert_eq!(msg.hostname, None);
        assert_eq!(msg.structured_data, None);
        assert_eq!(msg.message, None);
    }

    #[test]
    fn message_after_nil_header() {
        let (msg, err) = strict("<1>1 - - - - - - hi");
        assert!(err.is_none());
        assert_eq!(msg.unwrap().message.as_deref(), Some("hi"));
    }

    #[test]
    fn structured_data_captured_raw() {
        let (msg, err) =
            strict("<165>1 - - - - - [exampleSDID@32473 iut=\"3\" eventID=\"1011\"][another@1 k=\"v\"] body");
        assert!(err.is_none());
        let msg = msg.unwrap();
        assert_eq!(
            msg.structured_data.as_deref(),
            Some("[exampleSDID@32473 iut=\"3\" eventID=\"1011\"][another@1 k=\"v\"]")
        );
        assert_eq!(msg.message.as_deref(), Some("body"));
    }

    #[test]
    fn bad_timestamp_reports_column() {
        let (msg, err) = strict("<2>12 A B C D E -");
        assert!(msg.is_none());
        assert_eq!(err, Some(Rfc5424Error::Timestamp { col: 6 }));
    }

    #[test]
    fn best_effort_keeps_partial_header() {
        let (msg, err) = lenient("<2>12 A B C D E -");
        assert_eq!(err, Some(Rfc5424Error::Timestamp { col: 6 }));
        let msg = msg.unwrap();
        assert_eq!(msg.priority, Some(2));
        assert_eq!(msg.severity, Some(2));
        assert_eq!(msg.version, 12);
        assert_eq!(msg.timestamp, None);
    }

    #[test]
    fn truncated_header_is_incomplete() {
        let (msg, err) = lenient("<1>1");
        assert_eq!(err, Some(Rfc5424Error::Incomplete { col: 4 }));
        assert_eq!(msg.unwrap().version, 1);
    }

    #[test]
    fn priority_out_of_range() {
        let (msg, err) = strict("<192>1 - - - - - -");
        assert!(msg.is_none());
        assert_eq!(err, Some(Rfc5424Error::Priority { col: 1 }));
    }

    #[test]
    fn missing_angle_bracket() {
        let (_, err) = strict("34>1 - - - - - -");
        assert_eq!(err, Some(Rfc5424Error::Priority { col: 0 }));
    }

    #[test]
    fn version_zero_rejected() {
        let (_, err) = strict("<1>0 - - - - - -");
        assert_eq!(err, Some(Rfc5424Error::Version { col: 3 }));
    }

    #[test]
    fn hostname_starting_with_dash_is_a_value() {
        let (msg, err) = strict("<1>1 - -host - - - -");
        assert!(err.is_none());
        assert_eq!(msg.unwrap().hostname.as_deref(), Some("-host"));
    }

    #[test]
    fn oversized_appname_rejected() {
        let appname = "a".repeat(49);
        let input = format!("<1>1 - host {appname} - - -");
        let (_, err) = strict(&input);
        assert_eq!(err, Some(Rfc5424Error::Appname { col: 12 }));
    }

    #[test]
    fn utf8_message_body() {
        let (msg, err) = strict("<2>1 - host.local su - - - κόσμε");
        assert!(err.is_none());
        assert_eq!(msg.unwrap().message.as_deref(), Some("κόσμε"));
    }

    #[test]
    fn bom_stripped_from_message() {
        let mut input = b"<1>1 - - - - - - ".to_vec();
        input.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        input.extend_from_slice("hello".as_bytes());
        let (msg, err) = Rfc5424Parser::new().parse(&input);
        assert!(err.is_none());
        assert_eq!(msg.unwrap().message.as_deref(), Some("hello"));
    }

    #[test]
    fn timestamp_with_numeric_offset() {
        let (msg, err) = strict("<1>1 2003-08-24T05:14:15.000003-07:00 - - - - -");
        assert!(err.is_none());
        assert_eq!(
            msg.unwrap().timestamp.as_deref(),
            Some("2003-08-24T05:14:15.000003-07:00")
        );
    }

    #[test]
    fn timestamp_shape_rejects_fraction_overflow() {
        // Seven fractional digits exceed the RFC 5424 TIME-SECFRAC limit.
        let (_, err) = strict("<1>1 2003-08-24T05:14:15.0000003-07:00 - - - - -");
        assert_eq!(err, Some(Rfc5424Error::Timestamp { col: 5 }));
    }
}
