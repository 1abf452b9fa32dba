//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続中のクライアント集合（接続 ID → 送信キュー）を管理
//! - 全クライアントへのメッセージ送信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket 接続の受付と送信キューの生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! キューの受信側は UI 層の pusher loop がソケットへ書き出します。
//!
//! broadcast はキューへの `try_send` のみを行い、ソケットへの書き込みを待ちません。
//! そのため 1 つの遅いクライアントが他のクライアントへの配信を遅らせることはありません。
//! キューが溢れたクライアントは接続集合から外され、送信キューが閉じられます
//! （pusher loop が終了し、接続が切断されます）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{BroadcastReport, ConnectionId, MessagePusher, PusherChannel};

/// 接続 ID と送信キューのマップ
pub type ConnectionMap = Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>;

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する送信キューのマップ
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.register_client(connection_id, tx).await;
/// pusher.broadcast("{\"event\":\"chat message\",\"data\":{}}").await;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: ConnectionMap,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: ConnectionMap) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
        removed
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        let mut clients = self.clients.lock().await;
        let mut report = BroadcastReport::default();

        // ブロードキャストでは一部の送信失敗を許容し、失敗したクライアントのみ外す
        clients.retain(|connection_id, sender| match sender.try_send(content.to_string()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Connection '{}' is not keeping up (queue full), evicting",
                    connection_id
                );
                report.evicted.push(*connection_id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(
                    "Connection '{}' is already gone, removing from broadcast set",
                    connection_id
                );
                report.evicted.push(*connection_id);
                false
            }
        });

        report
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の接続集合の管理と broadcast
    //
    // 【なぜこのテストが必要か】
    // - broadcast はリレーの中核であり、送信者を含む全員に 1 通ずつ届く必要がある
    // - 1 つのクライアントの失敗が他のクライアントへの配信を妨げないことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 複数クライアントへの broadcast
    // 2. 切断済みクライアントを含む broadcast
    // 3. キューが溢れたクライアントの除外
    // 4. 登録解除（存在しない接続を含む）
    // ========================================

    fn create_test_pusher() -> (WebSocketMessagePusher, ConnectionMap) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_every_client() {
        // テスト項目: 全てのクライアントにちょうど 1 通ずつ届く
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        pusher.register_client(ConnectionId::generate(), tx1).await;
        pusher.register_client(ConnectionId::generate(), tx2).await;

        // when (操作):
        let report = pusher.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert!(report.evicted.is_empty());
        assert_eq!(rx1.recv().await, Some("hello".to_string()));
        assert_eq!(rx2.recv().await, Some("hello".to_string()));
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_client() {
        // テスト項目: 切断済みのクライアントがいても他のクライアントには届く
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (alive_tx, mut alive_rx) = mpsc::channel(8);
        let (gone_tx, gone_rx) = mpsc::channel(8);
        let gone = ConnectionId::generate();
        pusher
            .register_client(ConnectionId::generate(), alive_tx)
            .await;
        pusher.register_client(gone, gone_tx).await;
        drop(gone_rx);

        // when (操作):
        let report = pusher.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.evicted, vec![gone]);
        assert_eq!(alive_rx.recv().await, Some("hello".to_string()));
        assert!(!clients.lock().await.contains_key(&gone));
    }

    #[tokio::test]
    async fn test_broadcast_evicts_client_with_full_queue() {
        // テスト項目: キューが溢れたクライアントは外され、キューが閉じられる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (fast_tx, mut fast_rx) = mpsc::channel(8);
        let (slow_tx, mut slow_rx) = mpsc::channel(1);
        let slow = ConnectionId::generate();
        pusher
            .register_client(ConnectionId::generate(), fast_tx)
            .await;
        pusher.register_client(slow, slow_tx).await;

        // when (操作):
        let first = pusher.broadcast("first").await;
        let second = pusher.broadcast("second").await;

        // then (期待する結果):
        assert_eq!(first.delivered, 2);
        assert_eq!(second.delivered, 1);
        assert_eq!(second.evicted, vec![slow]);
        assert_eq!(pusher.count_clients().await, 1);

        assert_eq!(fast_rx.recv().await, Some("first".to_string()));
        assert_eq!(fast_rx.recv().await, Some("second".to_string()));

        // 遅いクライアントは溢れる前のメッセージを受け取った後、キューが閉じる
        assert_eq!(slow_rx.recv().await, Some("first".to_string()));
        assert_eq!(slow_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_clients() {
        // テスト項目: クライアントがいなくてもエラーにならない
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();

        // when (操作):
        let report = pusher.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除は冪等で、2 回目は false を返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, _rx) = mpsc::channel(8);
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;

        // when (操作):
        let first = pusher.unregister_client(&connection_id).await;
        let second = pusher.unregister_client(&connection_id).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(pusher.count_clients().await, 0);
    }
}
