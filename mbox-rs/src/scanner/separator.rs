//! `From ` separator line recognition
//!
//! A separator is `From <sender> <timestamp>`. The timestamp is not
//! validated beyond being non-empty; real mailboxes carry all sorts of
//! date formats on this line.

use chrono::{DateTime, NaiveDateTime, Utc};

const SEPARATOR_PREFIX: &[u8] = b"From ";

/// asctime layout used on separator lines, e.g. `Thu Jan  1 00:00:01 2015`
pub(crate) const ASCTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Strip a trailing `\n` and/or `\r`.
pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Whether a complete line is a message separator.
pub(crate) fn is_separator(line: &[u8]) -> bool {
    let Some(rest) = trim_line_end(line).strip_prefix(SEPARATOR_PREFIX) else {
        return false;
    };

    let sender_len = rest.iter().take_while(|b| !b.is_ascii_whitespace()).count();
    if sender_len == 0 {
        return false;
    }

    rest[sender_len..].iter().any(|b| !b.is_ascii_whitespace())
}

/// Whether an unterminated line could still turn into a separator once
/// the rest of it arrives.
pub(crate) fn could_start_separator(partial: &[u8]) -> bool {
    let n = partial.len().min(SEPARATOR_PREFIX.len());
    if partial[..n] != SEPARATOR_PREFIX[..n] {
        return false;
    }

    // "From " must be followed directly by the sender
    match partial.get(SEPARATOR_PREFIX.len()) {
        Some(b) => !b.is_ascii_whitespace(),
        None => true,
    }
}

/// Parsed separator line of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromLine {
    /// Envelope sender
    pub sender: String,
    /// Everything after the sender, trimmed
    pub timestamp: String,
    /// `timestamp` interpreted as an asctime date, when it is one
    pub date: Option<DateTime<Utc>>,
}

impl FromLine {
    /// Parse a separator line, with or without its line terminator.
    ///
    /// Returns `None` if the line is not a separator.
    pub fn parse(line: &[u8]) -> Option<Self> {
        if !is_separator(line) {
            return None;
        }

        let line = String::from_utf8_lossy(trim_line_end(line));
        let rest = &line[SEPARATOR_PREFIX.len()..];
        let (sender, timestamp) = rest.split_once(|c: char| c.is_ascii_whitespace())?;
        let timestamp = timestamp.trim();

        Some(Self {
            sender: sender.to_string(),
            timestamp: timestamp.to_string(),
            date: parse_asctime(timestamp),
        })
    }
}

/// Parse an asctime timestamp, tolerating the space padding of the day.
fn parse_asctime(timestamp: &str) -> Option<DateTime<Utc>> {
    let collapsed = timestamp.split_whitespace().collect::<Vec<_>>().join(" ");

    NaiveDateTime::parse_from_str(&collapsed, ASCTIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}
