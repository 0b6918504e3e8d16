use crate::error::{MboxError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Buffering limits for [`MboxReader`](crate::MboxReader).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Bytes reserved for the read buffer up front.
    pub initial_capacity: usize,
    /// Minimum number of bytes requested from the source per refill.
    pub read_chunk_size: usize,
    /// Largest message the reader accepts, counted from the start of its
    /// separator line to the end of its body (the framing blank line is not
    /// counted). The buffer may hold one extra `read_chunk_size` of
    /// look-ahead, so a message at the limit is accepted when the framing
    /// line and the next separator line fit in that margin. `0` means
    /// unlimited.
    pub max_message_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64 * 1024,
            read_chunk_size: 64 * 1024,
            max_message_size: 64 * 1024 * 1024, // 64MB
        }
    }
}

impl ReaderConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MboxError::Config(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| MboxError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            return Err(MboxError::Config(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.max_message_size != 0 && self.max_message_size < self.read_chunk_size {
            return Err(MboxError::Config(format!(
                "max_message_size ({}) is smaller than read_chunk_size ({})",
                self.max_message_size, self.read_chunk_size
            )));
        }
        Ok(())
    }
}
