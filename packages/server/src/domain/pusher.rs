//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信の抽象化。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ConnectionId;

/// クライアントごとの送信キュー
///
/// 容量付きのチャンネル。キューが溢れたクライアントは追いつけていないとみなされます。
pub type PusherChannel = mpsc::Sender<String>;

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信キューに積めた接続数
    pub delivered: usize,
    /// 送信できず接続集合から外された接続
    pub evicted: Vec<ConnectionId>,
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を接続集合に登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を接続集合から削除
    ///
    /// 登録されていた場合は `true` を返す。
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    /// 接続中の全クライアントにメッセージを送信
    ///
    /// 1 つのクライアントへの送信失敗は他のクライアントへの送信に影響しない。
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// 接続中のクライアント数を取得
    async fn count_clients(&self) -> usize;
}
