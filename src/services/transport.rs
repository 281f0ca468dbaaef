use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::interfaces::transport::{RelayRequest, RelayTransport};

const MESSAGES_PATH: &str = "/v1/messages";

/// Relay transport speaking the chat service's REST API.
pub struct HttpRelayTransport {
    base_url: String,
    authorization: Option<String>,
    client: reqwest::Client,
}

impl HttpRelayTransport {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| RelayError::Runtime(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.clone(),
            authorization: config
                .credentials()
                .map(|(address, password)| auth_token(address, password)),
            client,
        })
    }

    fn endpoint(request: &RelayRequest) -> (Method, String) {
        match request {
            RelayRequest::GetMessages => (Method::GET, MESSAGES_PATH.to_string()),
            RelayRequest::AcknowledgeDelivery(ack) => (
                Method::DELETE,
                format!(
                    "{MESSAGES_PATH}/{}/{}",
                    urlencoding::encode(&ack.source),
                    ack.timestamp
                ),
            ),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &RelayRequest) -> Result<Option<Value>> {
        let (method, path) = Self::endpoint(request);
        let url = join_url(&self.base_url, &path);
        let mut builder = self.client.request(method, url);
        if let Some(authorization) = &self.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder
            .send()
            .await
            .map_err(|e: reqwest::Error| RelayError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Http(format!("relay responded with {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e: reqwest::Error| RelayError::Http(e.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| RelayError::Serialization(e.to_string()))
    }
}

/// `Authorization` header value for the account's device password.
pub fn auth_token(address: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{address}:{password}")))
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
