//! ブロードキャスト Dispatcher
//!
//! 各接続の受信タスクはフレームを内部チャンネル経由で Dispatcher に渡すだけで、
//! 他の接続には直接触れません。Dispatcher は単一のタスクでフレームを受信順に
//! `MessagePusher::broadcast` へ渡すため、全てのクライアントが同じ順序で
//! メッセージを受け取ります。

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{DispatchError, MessagePusher};

/// Dispatcher タスクへのハンドル
///
/// クローンは同じ Dispatcher タスクを指します。全てのハンドルが drop されると
/// タスクは終了します。
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    tx: mpsc::UnboundedSender<String>,
}

impl BroadcastDispatcher {
    /// Dispatcher タスクを起動
    ///
    /// tokio ランタイム上で呼び出す必要があります。
    pub fn spawn(message_pusher: Arc<dyn MessagePusher>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(dispatch_loop(rx, message_pusher));
        (Self { tx }, handle)
    }

    /// フレームのブロードキャストを依頼
    pub fn dispatch(&self, frame: String) -> Result<(), DispatchError> {
        self.tx.send(frame).map_err(|_| DispatchError::Closed)
    }
}

async fn dispatch_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    message_pusher: Arc<dyn MessagePusher>,
) {
    while let Some(frame) = rx.recv().await {
        let report = message_pusher.broadcast(&frame).await;
        tracing::debug!(
            "Broadcasted frame to {} connection(s), evicted {}",
            report.delivered,
            report.evicted.len()
        );
    }
    tracing::debug!("Broadcast dispatcher stopped");
}
