//! WebSocket relay server implementation.

mod handler;
mod origin;
mod server;
mod signal;
pub mod state;

pub use origin::OriginPolicy;
pub use server::Server;
