//! ドメイン層
//!
//! リレーサーバーが扱う概念（接続 ID、メッセージ送信の抽象化）を定義します。
//! 永続化される状態は存在せず、接続中のクライアント集合のみが共有状態です。

mod error;
mod pusher;
mod value_object;

pub use error::DispatchError;
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use value_object::ConnectionId;
