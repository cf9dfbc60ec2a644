//! Append-only chat log.
//!
//! Offloads file I/O to a dedicated task so that handlers never wait on the
//! disk. Lines are queued on an unbounded channel; the writer task stamps
//! each one with an RFC 3339 UTC timestamp and appends it to the file.
//! Write failures are reported through `tracing` and otherwise swallowed.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

/// Work item for the writer task.
#[derive(Debug)]
enum LogCommand {
    Line(String),
    Flush(oneshot::Sender<()>),
}

#[derive(Debug, Clone)]
enum Sink {
    Disabled,
    File(mpsc::UnboundedSender<LogCommand>),
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Fire-and-forget sink for human-readable chat events.
#[derive(Debug, Clone)]
pub struct ChatLog {
    sink: Sink,
}

impl ChatLog {
    /// Appends to `path`, creating it if needed.
    ///
    /// Spawns the writer task, so this must be called inside a Tokio runtime.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(path, receiver));
        Self {
            sink: Sink::File(sender),
        }
    }

    /// A log that discards every line.
    pub fn disabled() -> Self {
        Self { sink: Sink::Disabled }
    }

    /// A log that keeps lines in memory, for inspection in tests.
    pub fn memory() -> Self {
        Self {
            sink: Sink::Memory(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Queues one line. Never blocks and never fails.
    pub fn append(&self, line: impl Into<String>) {
        match &self.sink {
            Sink::Disabled => {}
            Sink::File(sender) => {
                if sender.send(LogCommand::Line(line.into())).is_err() {
                    warn!("Chat log writer is gone, line dropped");
                }
            }
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.into());
                }
            }
        }
    }

    /// Waits until every line queued so far has been written.
    pub async fn flush(&self) {
        if let Sink::File(sender) = &self.sink {
            let (done, wait) = oneshot::channel();
            if sender.send(LogCommand::Flush(done)).is_ok() {
                let _ = wait.await;
            }
        }
    }

    /// Lines captured by a [`ChatLog::memory`] log; empty for other sinks.
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::disabled()
    }
}

async fn run_writer(path: PathBuf, mut receiver: mpsc::UnboundedReceiver<LogCommand>) {
    let mut file = open_log(&path).await;

    while let Some(command) = receiver.recv().await {
        match command {
            LogCommand::Line(line) => {
                let Some(handle) = file.as_mut() else {
                    continue;
                };
                let stamped = format!(
                    "[{}] {}\n",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    line
                );
                if let Err(e) = handle.write_all(stamped.as_bytes()).await {
                    error!("Failed to log message to {}: {}", path.display(), e);
                }
            }
            LogCommand::Flush(done) => {
                if let Some(handle) = file.as_mut() {
                    if let Err(e) = handle.flush().await {
                        error!("Failed to flush chat log {}: {}", path.display(), e);
                    }
                }
                let _ = done.send(());
            }
        }
    }
}

async fn open_log(path: &Path) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path).await {
        Ok(file) => Some(file),
        Err(e) => {
            error!("Failed to open chat log {}: {}", path.display(), e);
            None
        }
    }
}
