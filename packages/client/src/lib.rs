//! WebSocket chat client library.
//!
//! A client session holds one connection to the relay, submits composed
//! messages, and keeps every received message in an append-only log.

pub mod domain;
pub mod error;
pub mod session;

mod formatter;
mod runner;
mod ui;

pub use runner::run_client;
