//! Connection handling logic for WebSocket clients.
//!
//! This module manages the lifecycle of one client connection: WebSocket
//! handshake, session registration, the incoming and outgoing tasks, and
//! cleanup when either side ends the connection.

use crate::{
    config::ServerConfig,
    connection::{ConnectionId, Outbound, Outgoing},
    error::{RegistryError, ServerError},
    lifecycle::LifecycleController,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, warn};

/// Reply sent when an inbound frame exceeds `max_message_size`.
pub const MESSAGE_TOO_LONG: &str = "Error: Message too long.";

/// Close reason sent when the registry refuses a session for being full.
pub const SERVER_FULL: &str = "Server is full";

/// Handles a single client connection from establishment to cleanup.
///
/// # Connection Flow
///
/// 1. Perform WebSocket handshake
/// 2. Register the session through the lifecycle controller, refusing
///    the connection if the server is full
/// 3. Run the incoming and outgoing tasks until one of them ends
/// 4. Retire the session (a no-op if it was kicked)
///
/// # Message Handling
///
/// * **Incoming Task**: Text frames go to the dispatcher, pings are answered
/// * **Outgoing Task**: Drains the session's outbound channel to the socket;
///   a close request sends a close frame and ends the connection
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    lifecycle: Arc<LifecycleController>,
    config: Arc<ServerConfig>,
) -> Result<(), ServerError> {
    // Perform WebSocket handshake
    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| ServerError::Network(format!("WebSocket handshake failed: {e}")))?;

    let (ws_sender, mut ws_receiver) = ws_stream.split();
    let ws_sender = Arc::new(tokio::sync::Mutex::new(ws_sender));

    let connection_id = ConnectionId::new();
    let (outbound, mut outbound_receiver) = Outbound::channel();
    match lifecycle
        .on_connect(connection_id.clone(), outbound, Some(addr))
        .await
    {
        Ok(_) => {}
        Err(RegistryError::Full(limit)) => {
            warn!("🚫 Refusing {}: {} sessions already connected", addr, limit);
            let mut ws_sender = ws_sender.lock().await;
            let _ = ws_sender.send(close_message(SERVER_FULL)).await;
            return Ok(());
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    }

    let ws_sender_incoming = ws_sender.clone();
    let ws_sender_outgoing = ws_sender.clone();

    // Incoming message task
    let incoming_task = {
        let lifecycle = lifecycle.clone();
        let connection_id = connection_id.clone();
        let max_message_size = config.max_message_size;

        async move {
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if text.len() > max_message_size {
                            lifecycle.router().unicast(&connection_id, MESSAGE_TOO_LONG).await;
                            continue;
                        }
                        lifecycle.on_message(&connection_id, text.as_str()).await;
                    }
                    Ok(Message::Close(_)) => {
                        debug!("🔌 Client {} requested close", connection_id);
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        let mut ws_sender = ws_sender_incoming.lock().await;
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Err(e) => {
                        error!("WebSocket error for connection {}: {}", connection_id, e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    };

    // Outgoing message task
    let outgoing_task = {
        let ws_sender = ws_sender_outgoing;
        let connection_id = connection_id.clone();

        async move {
            while let Some(frame) = outbound_receiver.recv().await {
                let mut ws_sender = ws_sender.lock().await;
                match frame {
                    Outgoing::Text(text) => {
                        if let Err(e) = ws_sender.send(Message::Text(text.into())).await {
                            error!("Failed to send message to {}: {}", connection_id, e);
                            break;
                        }
                    }
                    Outgoing::Close(reason) => {
                        debug!("🔌 Closing connection {}: {}", connection_id, reason);
                        let _ = ws_sender.send(close_message(&reason)).await;
                        break;
                    }
                }
            }
        }
    };

    // Run both tasks concurrently until one completes
    tokio::select! {
        _ = incoming_task => {},
        _ = outgoing_task => {},
    }

    lifecycle.on_disconnect(&connection_id).await;
    let _ = ws_sender.lock().await.close().await;
    Ok(())
}

fn close_message(reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: reason.to_string().into(),
    }))
}
