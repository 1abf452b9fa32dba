//! WebSocket chat relay library.
//!
//! This library provides the relay server that fans out every received chat
//! message to all connected clients, the sender included.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
