//! Websocket transport behind the channel adapter.
//!
//! The backend pushes annotated frames as JSON envelopes
//! `{"event": <name>, "data": {...}}` and accepts the same shape for
//! commands (commands carry no data). One connection serves the whole
//! application run; there is no reconnect policy.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use motionaid_core::model::BackendCommand;

use crate::channel::{ChannelStatus, EventBus, ExerciseChannel, Subscription};
use crate::error::ChannelError;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

/// The shared live connection to the tracking backend.
pub struct SocketChannel {
    bus: EventBus,
    outbound: mpsc::UnboundedSender<String>,
    status: watch::Receiver<ChannelStatus>,
}

impl SocketChannel {
    /// Connects and spawns the reader/writer pump tasks.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Connect` when the websocket handshake fails.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (stream, _) = connect_async(url).await?;
        let (mut sink, mut source) = stream.split();

        let bus = EventBus::new();
        let (status_tx, status_rx) = watch::channel(ChannelStatus::Connected);
        let status_tx = Arc::new(status_tx);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let reader_bus = bus.clone();
        let reader_status = Arc::clone(&status_tx);
        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Envelope>(&text) {
                        Ok(envelope) => {
                            let delivered = reader_bus.publish(&envelope.event, &envelope.data);
                            log::trace!(
                                "event {:?} delivered to {delivered} subscriber(s)",
                                envelope.event
                            );
                        }
                        Err(err) => log::debug!("discarding malformed envelope: {err}"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        log::warn!("backend stream error: {err}");
                        break;
                    }
                }
            }
            reader_status.send_replace(ChannelStatus::Disconnected);
            log::info!("backend connection closed");
        });

        let writer_status = status_tx;
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(err) = sink.send(Message::Text(text)).await {
                    log::warn!("backend send failed: {err}");
                    break;
                }
            }
            writer_status.send_replace(ChannelStatus::Disconnected);
        });

        log::info!("connected to backend at {url}");
        Ok(Self {
            bus,
            outbound: outbound_tx,
            status: status_rx,
        })
    }
}

impl ExerciseChannel for SocketChannel {
    fn subscribe(&self, event: &str) -> Subscription {
        self.bus.subscribe(event)
    }

    fn send(&self, command: BackendCommand) -> Result<(), ChannelError> {
        if *self.status.borrow() == ChannelStatus::Disconnected {
            return Err(ChannelError::Disconnected);
        }
        let envelope = Envelope {
            event: command.wire_name().to_string(),
            data: Value::Null,
        };
        let text = serde_json::to_string(&envelope)
            .expect("command envelope serialization cannot fail");
        self.outbound
            .send(text)
            .map_err(|_| ChannelError::Disconnected)
    }

    fn status(&self) -> ChannelStatus {
        *self.status.borrow()
    }
}
