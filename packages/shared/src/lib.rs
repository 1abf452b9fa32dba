//! Code shared by the Hiroba relay server and its clients.
//!
//! - `protocol`: event envelope and chat message payload carried over WebSocket
//! - `logger`: tracing subscriber setup for the binaries

pub mod logger;
pub mod protocol;
