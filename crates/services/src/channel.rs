//! Real-time channel adapter: a pass-through transport abstraction.
//!
//! One connection is shared by the whole application; each page subscribes
//! to its own named events on it. The adapter does no payload validation,
//! no retry, and no reconnection; it only fans inbound events out to
//! subscribers and enqueues outbound commands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::sync::mpsc;

use motionaid_core::model::BackendCommand;

use crate::error::ChannelError;

/// Whether the shared backend connection is currently alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connected,
    Disconnected,
}

/// The transport seam every page talks through.
///
/// Injected from the composition root so tests can substitute a fake.
pub trait ExerciseChannel: Send + Sync {
    /// Subscribe to a named inbound event. Dropping the returned
    /// `Subscription` unsubscribes.
    fn subscribe(&self, event: &str) -> Subscription;

    /// Enqueue a fire-and-forget command for the backend.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Disconnected` when the connection is gone.
    fn send(&self, command: BackendCommand) -> Result<(), ChannelError>;

    fn status(&self) -> ChannelStatus;
}

/// A live subscription to one named event.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Value>,
    bus: EventBus,
    event: String,
    id: u64,
}

impl Subscription {
    /// Waits for the next payload. `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.remove(&self.event, self.id);
    }
}

/// Subscriber registry shared by the real and fake transports.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: HashMap<String, Vec<(u64, mpsc::UnboundedSender<Value>)>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self, event: &str) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .subscribers
            .entry(event.to_string())
            .or_default()
            .push((id, sender));

        Subscription {
            receiver,
            bus: self.clone(),
            event: event.to_string(),
            id,
        }
    }

    /// Delivers a payload to every live subscriber of `event`, pruning dead
    /// ones. Returns how many subscribers received it.
    pub fn publish(&self, event: &str, payload: &Value) -> usize {
        let mut inner = self.lock();
        let Some(list) = inner.subscribers.get_mut(event) else {
            return 0;
        };
        list.retain(|(_, sender)| sender.send(payload.clone()).is_ok());
        list.len()
    }

    fn remove(&self, event: &str, id: u64) {
        let mut inner = self.lock();
        if let Some(list) = inner.subscribers.get_mut(event) {
            list.retain(|(entry_id, _)| *entry_id != id);
            if list.is_empty() {
                inner.subscribers.remove(event);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        // A poisoned registry is still structurally sound; keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stand-in channel used when connecting to the backend failed.
///
/// Subscriptions never deliver and sends fail, which the UI surfaces as a
/// connectivity warning instead of refusing to launch.
#[derive(Clone, Default)]
pub struct OfflineChannel {
    bus: EventBus,
}

impl OfflineChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExerciseChannel for OfflineChannel {
    fn subscribe(&self, event: &str) -> Subscription {
        self.bus.subscribe(event)
    }

    fn send(&self, command: BackendCommand) -> Result<(), ChannelError> {
        log::debug!("dropping {:?} command: backend offline", command.wire_name());
        Err(ChannelError::Disconnected)
    }

    fn status(&self) -> ChannelStatus {
        ChannelStatus::Disconnected
    }
}
