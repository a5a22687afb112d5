//! Status event delivery from the recording worker

use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use super::ports::StatusListener;
use crate::domain::status::StatusEvent;

/// Shared, swappable slot for the current listener.
///
/// The recorder keeps one and hands clones to its worker, so a listener
/// installed mid-session receives the remaining events.
#[derive(Clone, Default)]
pub struct StatusNotifier {
    listener: Arc<RwLock<Option<Arc<dyn StatusListener>>>>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or clear the listener
    pub fn set_listener(&self, listener: Option<Arc<dyn StatusListener>>) {
        let mut slot = self
            .listener
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = listener;
    }

    /// Deliver `event` to the listener, if any. Never fails.
    pub fn emit(&self, event: StatusEvent) {
        debug!(code = event.code(), "{}", event.name());

        // Clone out of the lock so a listener calling set_listener cannot deadlock
        let listener = match self.listener.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if let Some(listener) = listener {
            listener.on_event(event);
        }
    }
}

/// Listener that forwards events into an unbounded channel.
///
/// Sending never blocks the worker; if the receiver is gone the event is
/// dropped.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusListener for ChannelListener {
    fn on_event(&self, event: StatusEvent) {
        let _ = self.sender.send(event);
    }
}

/// Create a channel listener and the receiver it feeds
pub fn status_channel() -> (ChannelListener, mpsc::UnboundedReceiver<StatusEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelListener { sender }, receiver)
}
