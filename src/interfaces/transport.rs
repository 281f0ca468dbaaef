use async_trait::async_trait;
use serde_json::Value;

use crate::domains::envelope::Acknowledgement;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayRequest {
    GetMessages,
    AcknowledgeDelivery(Acknowledgement),
}

/// Request executor for the relay service.
///
/// `Ok(None)` means the server answered successfully without a body.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<Option<Value>>;
}
