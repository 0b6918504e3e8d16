//! Message boundary scanner
//!
//! [`scan`] looks at the bytes currently buffered and decides whether they
//! hold one complete message. It keeps no state between calls: the only
//! state it needs, the multipart boundary of the message being scanned, is
//! rebuilt from that message's own headers every time.
//!
//! A separator that shows up inside a multipart body (between the headers
//! declaring `boundary=` and the closing `--boundary--` line) does not end
//! the message. If the closing line never arrives before end of input, the
//! boundary is disregarded and the body is split at the first separator.

pub mod boundary;
pub mod separator;

use std::ops::Range;

use crate::error::MalformedReason;
use boundary::{is_closing_delimiter, HeaderBoundary};
use separator::{could_start_separator, is_separator, trim_line_end};

pub use boundary::{content_type_boundary, extract_parameter};
pub use separator::FromLine;

/// Outcome of a single [`scan`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// Nothing can be decided yet; no bytes consumed. At end of input this
    /// means the window was empty.
    NeedMoreData,
    /// One complete message.
    Message {
        /// Length of the window prefix this message occupies
        consumed: usize,
        /// Separator line, without its terminator
        separator: Range<usize>,
        /// Message bytes, without the separator line or the blank line
        /// framing the next separator
        body: Range<usize>,
    },
    /// The window can never form a valid mailbox.
    Malformed(MalformedReason),
}

enum Search {
    Found(usize),
    Exhausted { open_boundary: bool },
}

/// Scan `window` for the first message. `at_end` tells whether more bytes
/// may still be appended to the window.
pub fn scan(window: &[u8], at_end: bool) -> ScanResult {
    scan_window(window, at_end, true)
}

/// Like [`scan`], but every separator line ends the message, even inside a
/// multipart body. Used to give up on a boundary whose closing line is out
/// of reach.
pub fn scan_ignoring_boundaries(window: &[u8], at_end: bool) -> ScanResult {
    scan_window(window, at_end, false)
}

fn scan_window(window: &[u8], at_end: bool, honor_boundary: bool) -> ScanResult {
    if window.is_empty() {
        return ScanResult::NeedMoreData;
    }

    let start = if window.starts_with(b"\n") {
        1
    } else if window.starts_with(b"\r\n") {
        2
    } else if window == b"\r" {
        return undecided(at_end, MalformedReason::MissingSeparator);
    } else {
        0
    };

    let Some(line_len) = find_newline(&window[start..]) else {
        let partial = &window[start..];
        if !could_start_separator(partial) {
            return ScanResult::Malformed(MalformedReason::MissingSeparator);
        }
        let reason = if partial.is_empty() {
            MalformedReason::MissingSeparator
        } else {
            MalformedReason::TruncatedSeparator
        };
        return undecided(at_end, reason);
    };

    let first_line = &window[start..start + line_len];
    if !is_separator(first_line) {
        return ScanResult::Malformed(MalformedReason::MissingSeparator);
    }

    let separator = start..start + trim_line_end(first_line).len();
    let body_start = start + line_len;

    match find_next_separator(window, body_start, honor_boundary) {
        Search::Found(next) => message(window, separator, body_start, next),
        Search::Exhausted { .. } if !at_end => ScanResult::NeedMoreData,
        Search::Exhausted { open_boundary } => {
            if open_boundary {
                if let Search::Found(next) = find_next_separator(window, body_start, false) {
                    return message(window, separator, body_start, next);
                }
            }
            last_message(window, separator, body_start)
        }
    }
}

fn undecided(at_end: bool, reason: MalformedReason) -> ScanResult {
    if at_end {
        ScanResult::Malformed(reason)
    } else {
        ScanResult::NeedMoreData
    }
}

/// Length of the first line including its `\n`.
fn find_newline(data: &[u8]) -> Option<usize> {
    data.iter().position(|&b| b == b'\n').map(|i| i + 1)
}

/// Walk complete lines from `start` looking for a separator that is not
/// inside a multipart body.
fn find_next_separator(window: &[u8], start: usize, honor_boundary: bool) -> Search {
    let mut headers = HeaderBoundary::new();
    let mut closed = false;
    let mut pos = start;

    while let Some(len) = find_newline(&window[pos..]) {
        let line = &window[pos..pos + len];

        match headers.boundary() {
            Some(boundary) if honor_boundary && !closed => {
                if is_closing_delimiter(line, boundary) {
                    closed = true;
                }
            }
            _ => {
                if is_separator(line) {
                    return Search::Found(pos);
                }
            }
        }

        headers.feed(line);
        pos += len;
    }

    Search::Exhausted {
        open_boundary: honor_boundary && !closed && headers.boundary().is_some(),
    }
}

fn message(window: &[u8], separator: Range<usize>, body_start: usize, next: usize) -> ScanResult {
    ScanResult::Message {
        consumed: next,
        separator,
        body: without_framing_line(window, body_start..next),
    }
}

fn last_message(window: &[u8], separator: Range<usize>, body_start: usize) -> ScanResult {
    if body_start == window.len() || !window.ends_with(b"\n") {
        return ScanResult::Malformed(MalformedReason::UnterminatedMessage);
    }

    ScanResult::Message {
        consumed: window.len(),
        separator,
        body: without_framing_line(window, body_start..window.len()),
    }
}

/// Drop the single blank line writers put after each message.
fn without_framing_line(window: &[u8], body: Range<usize>) -> Range<usize> {
    let bytes = &window[body.clone()];

    if bytes.ends_with(b"\r\n\r\n") {
        body.start..body.end - 2
    } else if bytes.ends_with(b"\n\n") {
        body.start..body.end - 1
    } else {
        body
    }
}
