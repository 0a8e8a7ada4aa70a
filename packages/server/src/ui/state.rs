//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase, GetDeviceListUseCase,
    InjectCommandUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（コネクション接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（コネクション切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchMessageUseCase（メッセージ分類・配信のユースケース）
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    /// InjectCommandUseCase（外部コマンドインテークのユースケース）
    pub inject_command_usecase: Arc<InjectCommandUseCase>,
    /// GetDeviceListUseCase（デバイス一覧取得のユースケース）
    pub get_device_list_usecase: Arc<GetDeviceListUseCase>,
}
