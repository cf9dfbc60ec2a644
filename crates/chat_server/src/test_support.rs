//! In-memory room used by the unit tests: a registry with named sessions
//! whose outbound receivers are kept for inspection.

use crate::chat_log::ChatLog;
use crate::connection::{ConnectionId, Outbound, Outgoing, SessionRegistry};
use crate::lifecycle::LifecycleController;
use crate::messaging::{Dispatcher, Router};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub const ADMIN_PASSWORD: &str = "letmein";

pub struct TestRoom {
    pub registry: Arc<SessionRegistry>,
    pub router: Router,
    pub dispatcher: Dispatcher,
    pub lifecycle: LifecycleController,
    pub chat_log: ChatLog,
    ids: HashMap<String, ConnectionId>,
    receivers: HashMap<String, UnboundedReceiver<Outgoing>>,
}

impl TestRoom {
    pub fn new() -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let chat_log = ChatLog::memory();
        let lifecycle =
            LifecycleController::new(registry.clone(), chat_log.clone(), ADMIN_PASSWORD);
        Self {
            router: lifecycle.router().clone(),
            dispatcher: lifecycle.dispatcher().clone(),
            registry,
            lifecycle,
            chat_log,
            ids: HashMap::new(),
            receivers: HashMap::new(),
        }
    }

    /// Registers one session per name directly in the registry, without
    /// announcements, so tests start from a quiet room.
    pub async fn with_names(names: &[&str]) -> Self {
        let mut room = Self::new();
        for (i, name) in names.iter().enumerate() {
            let id = ConnectionId::from(format!("conn-{i:04}"));
            let (outbound, rx) = Outbound::channel();
            room.registry
                .register(id.clone(), outbound, None)
                .await
                .expect("register");
            room.registry.rename(&id, name).await.expect("rename");
            room.ids.insert(name.to_string(), id);
            room.receivers.insert(name.to_string(), rx);
        }
        room
    }

    /// Tracks a receiver under `label` for a session registered elsewhere.
    pub fn track(&mut self, label: &str, id: ConnectionId, rx: UnboundedReceiver<Outgoing>) {
        self.ids.insert(label.to_string(), id);
        self.receivers.insert(label.to_string(), rx);
    }

    pub fn id(&self, label: &str) -> ConnectionId {
        self.ids[label].clone()
    }

    pub async fn send(&self, label: &str, line: &str) {
        self.dispatcher.dispatch(&self.ids[label], line).await;
    }

    /// Every frame queued for `label` so far.
    pub fn frames(&mut self, label: &str) -> Vec<Outgoing> {
        let rx = self.receivers.get_mut(label).expect("unknown session");
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Text lines queued for `label` so far.
    pub fn drain(&mut self, label: &str) -> Vec<String> {
        self.frames(label)
            .into_iter()
            .filter_map(|frame| match frame {
                Outgoing::Text(text) => Some(text),
                Outgoing::Close(_) => None,
            })
            .collect()
    }
}
