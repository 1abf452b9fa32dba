//! WebSocket chat relay server.
//!
//! Receives chat messages from clients and broadcasts them to every connected
//! client, the sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3001 --allowed-origin http://localhost:3000
//! ```

use std::time::Duration;

use clap::Parser;

use hiroba_server::{
    config::{
        DEFAULT_ALLOWED_ORIGIN, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_OUTBOUND_BUFFER, DEFAULT_PORT,
        DEFAULT_SEND_TIMEOUT, ServerConfig,
    },
    ui::Server,
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket chat relay with broadcast to every connected client", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Origin allowed to open WebSocket connections (repeatable)
    #[arg(short = 'o', long = "allowed-origin", default_values_t = [DEFAULT_ALLOWED_ORIGIN.to_string()])]
    allowed_origins: Vec<String>,

    /// Per-connection outbound queue capacity; slower clients are disconnected
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER, value_parser = parse_positive)]
    outbound_buffer: usize,

    /// Seconds a single socket write may take before the connection is closed
    #[arg(long, default_value_t = DEFAULT_SEND_TIMEOUT.as_secs())]
    send_timeout_secs: u64,

    /// Maximum inbound WebSocket message size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origins: args.allowed_origins,
            outbound_buffer: args.outbound_buffer,
            send_timeout: Duration::from_secs(args.send_timeout_secs),
            max_message_size: args.max_message_size,
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::info!("Allowed origins: {}", config.allowed_origins.join(", "));

    let server = Server::build(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
