//! Client configuration.

use std::time::Duration;

use crate::codec::DEFAULT_MAX_LINE_BYTES;

/// Tunables for [`crate::NetworkLoop`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound on name resolution plus TCP connect.
    pub connect_timeout: Duration,
    /// Outbound lines longer than this many bytes are truncated.
    pub max_line_bytes: usize,
    /// Bytes requested from the socket per read.
    pub read_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            read_chunk_size: 4096,
        }
    }
}
