//! UseCase 層
//!
//! リレーの 3 つの操作（接続・メッセージ中継・切断）をそれぞれ 1 つのユースケースとして提供します。

mod connect_client;
mod disconnect_client;
mod error;
mod relay_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::RelayError;
pub use relay_message::RelayMessageUseCase;
