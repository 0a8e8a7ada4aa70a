//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use irori_server::domain::{ControlEvent, DeviceListEvent, MessageKind, StatusEvent};

use crate::{
    command::{USAGE, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    ui::{PROMPT, redisplay_prompt},
};

/// Render one text frame from the hub.
///
/// Events are tried most-specific first; anything unparseable (such as the
/// welcome text) is shown verbatim.
fn render_hub_message(text: &str) -> String {
    if let Ok(list) = serde_json::from_str::<DeviceListEvent>(text) {
        return MessageFormatter::format_device_list(&list);
    }
    if let Ok(control) = serde_json::from_str::<ControlEvent>(text) {
        return MessageFormatter::format_control(&control);
    }
    if let Ok(status) = serde_json::from_str::<StatusEvent>(text) {
        if status.kind == MessageKind::DeviceStatus {
            return MessageFormatter::format_status(&status);
        }
    }
    MessageFormatter::format_raw_message(text)
}

/// Run the WebSocket client session
pub async fn run_client_session(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to the device-control hub!");
    println!("\nConnected to {}. Type 'help' for commands. Press Ctrl+C to exit.\n", url);

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!("{}", render_hub_message(&text));
                    redisplay_prompt();
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Hub closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to translate prompt lines and send them to the hub
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            if line.eq_ignore_ascii_case("help") {
                println!("{}", USAGE);
                redisplay_prompt();
                continue;
            }

            let json = match parse_command(&line) {
                Ok(json) => json,
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt();
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
