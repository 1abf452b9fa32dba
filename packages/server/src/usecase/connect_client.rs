//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 新しい接続が接続集合に登録され、以降の broadcast の対象になることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続ごとに異なる接続 ID で登録される

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// クライアント接続を実行
    ///
    /// 容量制限はなく、常に成功します。
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 新しく割り当てた接続 ID
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }

    /// 接続中のクライアント数を取得
    pub async fn count_clients(&self) -> usize {
        self.message_pusher.count_clients().await
    }
}
