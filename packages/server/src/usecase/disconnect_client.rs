//! UseCase: クライアント切断処理
//!
//! 切断したクライアントを接続集合から外すのみで、他のクライアントへの通知は行いません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// 接続集合に残っていた場合は `true`。broadcast 中に既に外されていた場合
    /// （送信キュー溢れなど）は `false`。
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        self.message_pusher.unregister_client(connection_id).await
    }
}
