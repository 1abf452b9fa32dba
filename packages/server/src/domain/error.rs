//! ドメイン層のエラー定義

use thiserror::Error;

/// ブロードキャスト依頼のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Dispatcher タスクが既に終了している
    #[error("Broadcast dispatcher is closed")]
    Closed,
}
