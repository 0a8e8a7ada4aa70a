//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, GetDeviceListUseCase,
    InjectCommandUseCase,
};

use super::{
    handler::{get_devices, health_check, post_command, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket device-control hub server
///
/// This struct encapsulates the server configuration and provides methods
/// to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     dispatch_message_usecase,
///     inject_command_usecase,
///     get_device_list_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（コネクション接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（コネクション切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchMessageUseCase（メッセージ分類・配信のユースケース）
    dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    /// InjectCommandUseCase（外部コマンドインテークのユースケース）
    inject_command_usecase: Arc<InjectCommandUseCase>,
    /// GetDeviceListUseCase（デバイス一覧取得のユースケース）
    get_device_list_usecase: Arc<GetDeviceListUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        dispatch_message_usecase: Arc<DispatchMessageUseCase>,
        inject_command_usecase: Arc<InjectCommandUseCase>,
        get_device_list_usecase: Arc<GetDeviceListUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            dispatch_message_usecase,
            inject_command_usecase,
            get_device_list_usecase,
        }
    }

    /// Run the device-control hub server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            dispatch_message_usecase: self.dispatch_message_usecase,
            inject_command_usecase: self.inject_command_usecase,
            get_device_list_usecase: self.get_device_list_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/devices", get(get_devices))
            .route("/api/command", post(post_command))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Device-control hub listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
