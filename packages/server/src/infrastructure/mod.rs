//! Infrastructure 層
//!
//! - `message_pusher`: ドメイン層の `MessagePusher` trait の実装
//! - `dispatcher`: ブロードキャストを 1 つのタスクで直列化する Dispatcher

pub mod dispatcher;
pub mod message_pusher;

pub use dispatcher::BroadcastDispatcher;
