//! mboxo writer
//!
//! Produces mailboxes that [`MboxReader`](crate::MboxReader) splits back
//! into the same messages.

use chrono::{DateTime, Utc};
use std::io::Write;

use crate::error::Result;
use crate::scanner::separator::ASCTIME_FORMAT;

/// MBOX writer for exporting messages
pub struct MboxWriter<W: Write> {
    writer: W,
    message_count: u64,
}

impl<W: Write> MboxWriter<W> {
    /// Create a new MBOX writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            message_count: 0,
        }
    }

    /// Append one message.
    ///
    /// Lines of `raw_message` starting with `From ` are escaped as
    /// `>From `. An empty `from` is written as `MAILER-DAEMON`, a missing
    /// date as the current time.
    ///
    /// mboxo cannot represent every byte string. A message without a final
    /// newline gets one, and an empty message reads back as a single
    /// blank line (`"\n"`), since the body and its framing line can't be
    /// told apart.
    pub fn write_message(
        &mut self,
        from: &str,
        date: Option<DateTime<Utc>>,
        raw_message: &[u8],
    ) -> Result<()> {
        let date = date.unwrap_or_else(Utc::now);
        let from_addr = if from.is_empty() { "MAILER-DAEMON" } else { from };

        writeln!(self.writer, "From {} {}", from_addr, date.format(ASCTIME_FORMAT))?;

        for line in raw_message.split_inclusive(|&b| b == b'\n') {
            if line.starts_with(b"From ") {
                self.writer.write_all(b">")?;
            }
            self.writer.write_all(line)?;
        }

        if !raw_message.is_empty() && !raw_message.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }

        // Blank line framing the next separator
        writeln!(self.writer)?;

        self.message_count += 1;
        Ok(())
    }

    /// Get the number of messages written
    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 1).unwrap())
    }

    #[test]
    fn test_separator_format() {
        let mut writer = MboxWriter::new(Vec::new());
        writer
            .write_message("herp.derp@example.com", date(), b"Subject: Test\n\nHi.\n")
            .unwrap();

        let out = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "From herp.derp@example.com Thu Jan  1 00:00:01 2015\nSubject: Test\n\nHi.\n\n"
        );
    }

    #[test]
    fn test_escapes_from_lines() {
        let mut writer = MboxWriter::new(Vec::new());
        writer
            .write_message("a@b", date(), b"Subject: x\n\nFrom the start\n>From quoted\nFrom:")
            .unwrap();

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(out.contains("\n>From the start\n"));
        assert!(out.contains("\n>From quoted\n"));
        assert!(out.ends_with("\nFrom:\n\n"));
    }

    #[test]
    fn test_empty_sender_and_count() {
        let mut writer = MboxWriter::new(Vec::new());
        writer.write_message("", date(), b"Subject: x\n").unwrap();
        writer.write_message("", None, b"Subject: y\n").unwrap();
        assert_eq!(writer.message_count(), 2);

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(out.starts_with("From MAILER-DAEMON Thu Jan  1 00:00:01 2015\n"));
    }
}
