//! Streaming mbox reader
//!
//! [`MboxReader`] pulls bytes from any [`Read`] source, runs the
//! [`scanner`](crate::scanner) over what it has buffered and hands out one
//! [`Message`] per mailbox entry.

use bytes::{Buf, Bytes, BytesMut};
use std::fs::File;
use std::io::{self, BufRead, Read};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::config::ReaderConfig;
use crate::error::{MalformedReason, MboxError, Result};
use crate::scanner::{scan, scan_ignoring_boundaries, FromLine, ScanResult};

/// One message extracted from a mailbox.
///
/// Holds the message bytes (headers and body, without the `From `
/// separator line) and implements [`Read`] and [`BufRead`] over them.
/// The bytes are owned, so a `Message` stays valid no matter what the
/// reader does afterwards.
#[derive(Debug, Clone)]
pub struct Message {
    separator: Bytes,
    body: Bytes,
    offset: u64,
}

impl Message {
    /// The separator line, without its terminator
    pub fn separator(&self) -> &[u8] {
        &self.separator
    }

    /// Sender and date from the separator line
    pub fn from_line(&self) -> Option<FromLine> {
        FromLine::parse(&self.separator)
    }

    /// Stream offset of the separator line
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes not read yet
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether every byte has been read
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Bytes not read yet
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Take the unread bytes
    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

impl Read for Message {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.body.len());
        buf[..n].copy_from_slice(&self.body[..n]);
        self.body.advance(n);
        Ok(n)
    }
}

impl BufRead for Message {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.body)
    }

    fn consume(&mut self, amt: usize) {
        self.body.advance(amt.min(self.body.len()));
    }
}

/// Condition that ends a reader for good
#[derive(Debug, Clone, Copy)]
enum Failure {
    Malformed { reason: MalformedReason, offset: u64 },
    TooLarge { limit: usize, offset: u64 },
}

impl From<Failure> for MboxError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Malformed { reason, offset } => MboxError::Malformed { reason, offset },
            Failure::TooLarge { limit, offset } => MboxError::MessageTooLarge { limit, offset },
        }
    }
}

/// Splits an mbox byte stream into [`Message`]s.
///
/// Not internally synchronized; share it between threads behind a mutex.
///
/// # Example
///
/// ```
/// use mbox_rs::MboxReader;
/// use std::io::Read;
///
/// let data = "From a@example.com Thu Jan  1 00:00:01 2015\nSubject: Hi\n\nHello.\n";
/// let mut reader = MboxReader::new(data.as_bytes());
///
/// let mut message = reader.next_message()?.expect("one message");
/// let mut text = String::new();
/// message.read_to_string(&mut text)?;
/// assert_eq!(text, "Subject: Hi\n\nHello.\n");
///
/// assert!(reader.next_message()?.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MboxReader<R> {
    source: R,
    buf: BytesMut,
    config: ReaderConfig,
    eof: bool,
    offset: u64,
    messages_read: u64,
    failure: Option<Failure>,
    iter_fused: bool,
}

impl MboxReader<File> {
    /// Open an mbox file with the default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> MboxReader<R> {
    /// Create a reader with the default configuration
    pub fn new(source: R) -> Self {
        Self::build(source, ReaderConfig::default())
    }

    /// Create a reader with a custom configuration, rejecting invalid ones
    pub fn with_config(source: R, config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(source, config))
    }

    fn build(source: R, config: ReaderConfig) -> Self {
        Self {
            source,
            buf: BytesMut::with_capacity(config.initial_capacity),
            config,
            eof: false,
            offset: 0,
            messages_read: 0,
            failure: None,
            iter_fused: false,
        }
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Malformed input
    /// fails the reader permanently: every later call returns the same
    /// error. Messages returned earlier are unaffected.
    pub fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(failure) = self.failure {
                return Err(failure.into());
            }

            match scan(&self.buf, self.eof) {
                ScanResult::NeedMoreData if self.eof => return Ok(None),
                ScanResult::NeedMoreData if self.buffer_full() => {
                    // The closing line of an open multipart boundary is out
                    // of reach, split at the next separator instead
                    return match scan_ignoring_boundaries(&self.buf, false) {
                        ScanResult::Message {
                            consumed,
                            separator,
                            body,
                        } => self.extract(consumed, separator, body).map(Some),
                        _ => Err(self.fail(Failure::TooLarge {
                            limit: self.config.max_message_size,
                            offset: self.offset,
                        })),
                    };
                }
                ScanResult::NeedMoreData => self.fill()?,
                ScanResult::Message {
                    consumed,
                    separator,
                    body,
                } => return self.extract(consumed, separator, body).map(Some),
                ScanResult::Malformed(reason) => {
                    return Err(self.fail(Failure::Malformed {
                        reason,
                        offset: self.offset,
                    }));
                }
            }
        }
    }

    /// Split a scanned message off the buffer.
    fn extract(
        &mut self,
        consumed: usize,
        separator: Range<usize>,
        body: Range<usize>,
    ) -> Result<Message> {
        let limit = self.config.max_message_size;
        if limit != 0 && body.end - separator.start > limit {
            return Err(self.fail(Failure::TooLarge {
                limit,
                offset: self.offset,
            }));
        }

        let chunk = self.buf.split_to(consumed).freeze();
        let message = Message {
            offset: self.offset + separator.start as u64,
            separator: chunk.slice(separator),
            body: chunk.slice(body),
        };

        self.offset += consumed as u64;
        self.messages_read += 1;
        debug!(
            offset = message.offset,
            size = message.len(),
            "Extracted message"
        );

        Ok(message)
    }

    /// Most bytes the buffer may hold: the message limit plus one read
    /// chunk of look-ahead for the next separator line.
    fn buffer_cap(&self) -> Option<usize> {
        match self.config.max_message_size {
            0 => None,
            limit => Some(limit.saturating_add(self.config.read_chunk_size)),
        }
    }

    fn buffer_full(&self) -> bool {
        self.buffer_cap().is_some_and(|cap| self.buf.len() >= cap)
    }

    /// Append the next chunk of the source to the buffer.
    fn fill(&mut self) -> Result<()> {
        // Grow with the buffer so rescanning a large message stays linear
        let mut want = self.config.read_chunk_size.max(self.buf.len());
        if let Some(cap) = self.buffer_cap() {
            want = want.min(cap - self.buf.len());
        }

        let start = self.buf.len();
        self.buf.resize(start + want, 0);

        let read = loop {
            match self.source.read(&mut self.buf[start..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match read {
            Ok(n) => {
                self.buf.truncate(start + n);
                if n == 0 {
                    trace!(buffered = start, "Source exhausted");
                    self.eof = true;
                } else {
                    trace!(bytes = n, buffered = self.buf.len(), "Read from source");
                }
                Ok(())
            }
            Err(e) => {
                self.buf.truncate(start);
                Err(e.into())
            }
        }
    }

    fn fail(&mut self, failure: Failure) -> MboxError {
        let err = MboxError::from(failure);
        warn!(error = %err, "Mailbox reader failed");
        self.failure = Some(failure);
        err
    }

    /// Number of messages returned so far
    pub fn messages_read(&self) -> u64 {
        self.messages_read
    }

    /// Number of stream bytes consumed by returned messages
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Get the reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Give back the source. Buffered bytes not yet returned are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Yields messages until the stream ends or the first error.
impl<R: Read> Iterator for MboxReader<R> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_fused {
            return None;
        }

        let item = self.next_message().transpose();
        if matches!(item, Some(Err(_))) {
            self.iter_fused = true;
        }
        item
    }
}
