//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - chat message イベントのペイロードがそのまま全員に broadcast されること
//!
//! ### なぜこのテストが必要か
//! - リレーはペイロードを解釈・変更しない（バイト単位でそのまま転送する）
//! - 不正なフレームを受け取ってもサーバーが落ちないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：chat message の中継
//! - エッジケース：必須フィールドが欠けたペイロード（そのまま中継する）
//! - 異常系：JSON ではないフレーム、未知のイベント、Dispatcher の停止

use hiroba_shared::protocol::{decode_event, encode_raw_chat_message};

use crate::{domain::ConnectionId, infrastructure::BroadcastDispatcher};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Dispatcher（broadcast の直列化）
    dispatcher: BroadcastDispatcher,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(dispatcher: BroadcastDispatcher) -> Self {
        Self { dispatcher }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - フレームを送ってきた接続の ID
    /// * `frame` - 受信した WebSocket テキストフレーム
    ///
    /// # Returns
    ///
    /// * `Ok(())` - broadcast を Dispatcher に依頼した
    /// * `Err(RelayError)` - フレームを破棄した
    pub fn execute(&self, from: &ConnectionId, frame: &str) -> Result<(), RelayError> {
        let envelope =
            decode_event(frame).map_err(|e| RelayError::MalformedFrame(e.to_string()))?;

        if !envelope.is_chat_message() {
            return Err(RelayError::UnknownEvent(envelope.event));
        }

        // ペイロードは解釈せず、受信したバイト列のまま再送する
        let outgoing = encode_raw_chat_message(envelope.data)
            .map_err(|e| RelayError::MalformedFrame(e.to_string()))?;

        tracing::debug!("Relaying chat message from '{}': {}", from, outgoing);

        self.dispatcher
            .dispatch(outgoing)
            .map_err(|_| RelayError::DispatcherClosed)
    }
}
