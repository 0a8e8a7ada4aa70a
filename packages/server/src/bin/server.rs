//! irori device-control hub server.
//!
//! Accepts WebSocket connections from clients and devices, routes their
//! control messages, and broadcasts every accepted change to all connected
//! parties.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;

use irori_server::{
    domain::DeviceRegistry,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryDeviceRepository,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, DispatchMessageUseCase,
        GetDeviceListUseCase, InjectCommandUseCase,
    },
};
use irori_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Device-control hub with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Broadcast sequencer
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory device registry)
    let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
    let repository = Arc::new(InMemoryDeviceRepository::new(registry));

    // 2. Create MessagePusher (WebSocket implementation)
    let connections = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(connections));

    // 3. Create the broadcast sequencer shared by every mutating use case
    let sequencer = Arc::new(Mutex::new(()));
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
        clock.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
        clock,
    ));
    let dispatch_message_usecase = Arc::new(DispatchMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer,
    ));
    let inject_command_usecase = Arc::new(InjectCommandUseCase::new(
        dispatch_message_usecase.clone(),
    ));
    let get_device_list_usecase = Arc::new(GetDeviceListUseCase::new(repository));

    // 5. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        dispatch_message_usecase,
        inject_command_usecase,
        get_device_list_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
