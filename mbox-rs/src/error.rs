use thiserror::Error;

/// Why a mailbox stream was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("missing leading \"From \" separator line")]
    MissingSeparator,

    #[error("message is truncated or lacks a trailing line terminator")]
    UnterminatedMessage,

    #[error("separator line truncated at end of input")]
    TruncatedSeparator,
}

#[derive(Error, Debug)]
pub enum MboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed mailbox data at byte {offset}: {reason}")]
    Malformed { reason: MalformedReason, offset: u64 },

    #[error("Message at byte {offset} exceeds the {limit} byte limit")]
    MessageTooLarge { limit: usize, offset: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MboxError {
    /// The malformed-input reason, if this is a malformed-data error.
    pub fn malformed_reason(&self) -> Option<MalformedReason> {
        match self {
            MboxError::Malformed { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = MboxError::Malformed {
            reason: MalformedReason::MissingSeparator,
            offset: 42,
        };
        assert_eq!(
            err.to_string(),
            "Malformed mailbox data at byte 42: missing leading \"From \" separator line"
        );
        assert_eq!(err.malformed_reason(), Some(MalformedReason::MissingSeparator));
    }

    #[test]
    fn test_io_conversion() {
        let err: MboxError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, MboxError::Io(_)));
        assert_eq!(err.malformed_reason(), None);
    }
}
