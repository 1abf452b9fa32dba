//! Terminal chat client.
//!
//! Connects to the relay, sends each typed line as a chat message and prints
//! every message the relay broadcasts, including its own.
//! A random display name and avatar colour are picked at startup unless a
//! name is given. The client exits when the connection is lost.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client
//! cargo run --bin hiroba-client -- --username Alice --url ws://127.0.0.1:3001/ws
//! ```

use clap::Parser;

use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for the Hiroba chat relay", long_about = None)]
struct Args {
    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3001/ws")]
    url: String,

    /// Origin header presented in the handshake; must be allowed by the relay
    #[arg(short = 'o', long, default_value = "http://localhost:3000")]
    origin: String,

    /// Display name (a random one is picked when omitted)
    #[arg(short = 'n', long)]
    username: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = hiroba_client::run_client(args.url, args.origin, args.username).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
