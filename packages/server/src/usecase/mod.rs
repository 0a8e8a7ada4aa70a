//! UseCase layer of the device-control hub.

mod connect_client;
mod disconnect_client;
mod dispatch_message;
mod error;
mod get_device_list;
mod inject_command;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use connect_client::{ConnectClientUseCase, WELCOME_MESSAGE};
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatch_message::DispatchMessageUseCase;
pub use error::{ConnectError, DiscardReason};
pub use get_device_list::GetDeviceListUseCase;
pub use inject_command::InjectCommandUseCase;

/// The single ordering point for registry mutation and fan-out.
///
/// Held across mutate + serialize + broadcast so every connection observes
/// state changes and their broadcasts in one global order: no connection
/// can see a broadcast for state X and later receive a stale snapshot
/// reflecting pre-X data. Plain snapshot reads run outside it.
pub type BroadcastSequencer = Arc<Mutex<()>>;
