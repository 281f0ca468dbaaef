use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::domains::envelope::Envelope;
use crate::error::{RelayError, Result};
use crate::interfaces::receiver::MessageReceiver;

pub struct LoggingReceiver;

#[async_trait]
impl MessageReceiver for LoggingReceiver {
    async fn handle_received_envelope(&self, envelope: Envelope) -> Result<()> {
        info!(
            envelope_type = ?envelope.envelope_type,
            source = %envelope.source,
            source_device = envelope.source_device,
            timestamp = envelope.timestamp,
            relay = envelope.relay.as_deref().unwrap_or(""),
            legacy_bytes = envelope.legacy_message.as_ref().map_or(0, Vec::len),
            content_bytes = envelope.content.as_ref().map_or(0, Vec::len),
            "received envelope"
        );
        Ok(())
    }
}

/// Hands envelopes to whoever owns the other end of the channel.
pub struct ChannelReceiver {
    sender: mpsc::Sender<Envelope>,
}

impl ChannelReceiver {
    pub fn new(sender: mpsc::Sender<Envelope>) -> Self {
        Self { sender }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl MessageReceiver for ChannelReceiver {
    async fn handle_received_envelope(&self, envelope: Envelope) -> Result<()> {
        self.sender
            .send(envelope)
            .await
            .map_err(|_| RelayError::Runtime("envelope channel closed".to_string()))
    }
}
