//! Server configuration.

/// Echo server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "127.0.0.1:1234")
    pub bind_address: String,
    /// Pending connections the kernel queues before refusing
    pub backlog: u32,
    /// Largest single read per connection, in bytes
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "127.0.0.1:1234".to_string(), backlog: 100, read_buffer_size: 1000 }
    }
}
