//! # Chat Hub - Terminal Client
//!
//! Connects to a chat hub, forwards every stdin line as one text frame and
//! prints every text frame received. Commands such as `/w` or `/clientlist`
//! are typed as-is; the server interprets them.

use clap::Parser;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "chat")]
#[command(about = "Terminal client for the chat hub")]
struct Args {
    /// Server WebSocket URL
    #[arg(short, long, default_value = "ws://127.0.0.1:3000")]
    url: String,

    /// Display name to claim right after connecting (sends /username)
    #[arg(short, long)]
    name: Option<String>,

    /// Client log level (logs go to stderr)
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

/// Turns one line of terminal input into the frame to send, if any.
fn outgoing_line(line: &str) -> Option<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Frames sent before any user input.
fn initial_frames(args: &Args) -> Vec<String> {
    args.name
        .iter()
        .map(|name| format!("/username {name}"))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("🔌 Connecting to {}", args.url);
    let (ws_stream, _) = connect_async(args.url.as_str()).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    info!("✅ Connected");

    for frame in initial_frames(&args) {
        ws_sender.send(Message::Text(frame.into())).await?;
    }

    // Incoming: print everything the server says
    let incoming = async move {
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => println!("{}", text.as_str()),
                Ok(Message::Close(frame)) => {
                    match frame {
                        Some(frame) if !frame.reason.as_str().is_empty() => {
                            println!("Connection closed: {}", frame.reason.as_str())
                        }
                        _ => println!("Connection closed."),
                    }
                    break;
                }
                Ok(other) => debug!("Ignoring frame: {:?}", other),
                Err(e) => {
                    error!("❌ WebSocket error: {}", e);
                    break;
                }
            }
        }
    };

    // Outgoing: one frame per stdin line
    let outgoing = async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(frame) = outgoing_line(&line) else {
                        continue;
                    };
                    if let Err(e) = ws_sender.send(Message::Text(frame.into())).await {
                        error!("❌ Failed to send: {}", e);
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        let _ = ws_sender.close().await;
    };

    tokio::select! {
        _ = incoming => {},
        _ = outgoing => {},
    }

    Ok(())
}
