//! Server state shared by the handlers.

use std::{sync::Arc, time::Duration};

use crate::usecase::{ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase};

use super::OriginPolicy;

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// Origins allowed to open WebSocket connections
    pub origin_policy: OriginPolicy,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
    /// Bound on a single socket write
    pub send_timeout: Duration,
    /// Maximum size of an inbound WebSocket message
    pub max_message_size: usize,
}
