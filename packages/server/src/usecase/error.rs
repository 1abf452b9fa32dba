//! UseCase 層のエラー定義

use thiserror::Error;

/// メッセージ中継のエラー
///
/// いずれも送信者には通知されず、ログに記録されるのみです。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// JSON として解釈できない、または event / data を持たないフレーム
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// chat message 以外のイベント
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    /// Dispatcher タスクが既に終了している
    #[error("Broadcast dispatcher is closed")]
    DispatcherClosed,
}
