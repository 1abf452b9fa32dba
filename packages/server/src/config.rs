//! Server configuration.

use std::time::Duration;

/// Default port the relay listens on
pub const DEFAULT_PORT: u16 = 3001;
/// Default client origin allowed to open WebSocket connections
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
/// Default capacity of each connection's outbound queue (frames)
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;
/// Default bound on a single socket write
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);
/// Default maximum size of an inbound WebSocket message (bytes)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Relay server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to bind to
    pub port: u16,
    /// Origins allowed to connect (exact match against the `Origin` header)
    pub allowed_origins: Vec<String>,
    /// Capacity of each connection's outbound queue. A connection whose queue
    /// is full when a broadcast arrives is disconnected.
    pub outbound_buffer: usize,
    /// Bound on a single socket write before the connection is closed
    pub send_timeout: Duration,
    /// Maximum size of an inbound WebSocket message
    pub max_message_size: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: デフォルト値は localhost:3000 のクライアントを受け付ける 3001 番ポート
        // given (前提条件):

        // when (操作):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.outbound_buffer, 256);
    }
}
