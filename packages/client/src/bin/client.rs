//! Interactive CLI client for the irori device-control hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client
//! cargo run --bin irori-client -- --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use irori_client::session::run_client_session;
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "CLI client for the irori device-control hub", long_about = None)]
struct Args {
    /// WebSocket URL of the hub
    #[arg(short, long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
