//! mbox-rs: incremental mbox splitter
//!
//! Splits a stream of "mboxo" mailbox data into individual messages
//! without loading the whole mailbox into memory.
//!
//! # Features
//!
//! - **Streaming**: works on any [`std::io::Read`] source, refilling its
//!   buffer on demand
//! - **MIME aware**: unescaped `From ` lines inside a multipart body do not
//!   split the message
//! - **Strict**: malformed input is reported with a precise reason instead
//!   of being skipped
//!
//! # Example
//!
//! ```
//! use mbox_rs::MboxReader;
//!
//! let mbox = "From herp.derp@example.com Thu Jan  1 00:00:01 2015
//! Subject: Test
//!
//! Hello.
//!
//! From derp.herp@example.com Thu Jan  1 00:00:02 2015
//! Subject: Another test
//!
//! Bye.
//! ";
//!
//! let reader = MboxReader::new(mbox.as_bytes());
//! let senders: Vec<String> = reader
//!     .map(|message| message.unwrap().from_line().unwrap().sender)
//!     .collect();
//!
//! assert_eq!(senders, ["herp.derp@example.com", "derp.herp@example.com"]);
//! ```
//!
//! # Modules
//!
//! - [`scanner`]: stateless message boundary detection
//! - [`reader`]: buffered reader built on the scanner
//! - [`writer`]: mboxo writer
//! - [`config`]: reader configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod reader;
pub mod scanner;
pub mod writer;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use error::{MalformedReason, MboxError, Result};
pub use reader::{MboxReader, Message};
pub use scanner::{scan, scan_ignoring_boundaries, FromLine, ScanResult};
pub use writer::MboxWriter;
