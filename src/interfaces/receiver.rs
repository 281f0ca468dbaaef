use async_trait::async_trait;

use crate::domains::envelope::Envelope;
use crate::error::Result;

#[async_trait]
pub trait MessageReceiver: Send + Sync {
    async fn handle_received_envelope(&self, envelope: Envelope) -> Result<()>;
}
