//! Request handlers.

mod http;
mod websocket;

pub use http::liveness;
pub use websocket::websocket_handler;
