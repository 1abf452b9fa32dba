//! Server execution logic.

use std::{collections::HashMap, future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::{BroadcastDispatcher, message_pusher::WebSocketMessagePusher},
    usecase::{ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase},
};

use super::{
    OriginPolicy,
    handler::{liveness, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// This struct owns the server configuration and the use cases, and provides
/// methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::build(ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    relay_message_usecase: Arc<RelayMessageUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `connect_client_usecase` - UseCase for client connection
    /// * `disconnect_client_usecase` - UseCase for client disconnection
    /// * `relay_message_usecase` - UseCase for relaying chat messages
    pub fn new(
        config: ServerConfig,
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
    ) -> Self {
        Self {
            config,
            connect_client_usecase,
            disconnect_client_usecase,
            relay_message_usecase,
        }
    }

    /// Create a Server wired with the in-memory connection set and a broadcast dispatcher
    ///
    /// Must be called from within a tokio runtime, since the dispatcher task is
    /// spawned here.
    pub fn build(config: ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. MessagePusher (connection set)
        // 2. Dispatcher
        // 3. UseCases

        // 1. Create MessagePusher (WebSocket implementation)
        let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

        // 2. Spawn the broadcast dispatcher; it stops once every handle is dropped
        let (dispatcher, _dispatcher_task) = BroadcastDispatcher::spawn(message_pusher.clone());

        // 3. Create UseCases
        let connect_client_usecase = Arc::new(ConnectClientUseCase::new(message_pusher.clone()));
        let disconnect_client_usecase =
            Arc::new(DisconnectClientUseCase::new(message_pusher.clone()));
        let relay_message_usecase = Arc::new(RelayMessageUseCase::new(dispatcher));

        Self::new(
            config,
            connect_client_usecase,
            disconnect_client_usecase,
            relay_message_usecase,
        )
    }

    /// Build the axum router
    pub fn router(self) -> Router {
        let origin_policy = OriginPolicy::new(&self.config.allowed_origins);
        let cors = origin_policy.cors_layer();

        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            relay_message_usecase: self.relay_message_usecase,
            origin_policy,
            outbound_buffer: self.config.outbound_buffer,
            send_timeout: self.config.send_timeout,
            max_message_size: self.config.max_message_size,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(liveness))
            .with_state(app_state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the WebSocket relay server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.run_with_listener(listener, shutdown_signal()).await?;

        Ok(())
    }

    /// Run the server on an already bound listener until `shutdown` resolves
    pub async fn run_with_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!("WebSocket relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
