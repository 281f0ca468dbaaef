#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use toshi_relay::error::{RelayError, Result};
use toshi_relay::interfaces::receiver::MessageReceiver;
use toshi_relay::interfaces::transport::{RelayRequest, RelayTransport};
use toshi_relay::{Acknowledgement, Envelope};

/// Answers `GetMessages` from a queue of canned pages and records every
/// request it sees.
pub struct ScriptedTransport {
    pages: Mutex<VecDeque<Result<Option<Value>>>>,
    requests: Mutex<Vec<RelayRequest>>,
    fail_acknowledgements: bool,
}

impl ScriptedTransport {
    pub fn new(pages: Vec<Result<Option<Value>>>) -> Self {
        Self {
            pages: Mutex::new(VecDeque::from(pages)),
            requests: Mutex::new(Vec::new()),
            fail_acknowledgements: false,
        }
    }

    pub fn failing_acknowledgements(mut self) -> Self {
        self.fail_acknowledgements = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| matches!(request, RelayRequest::GetMessages))
            .count()
    }

    pub fn acknowledged_timestamps(&self) -> Vec<u64> {
        self.acknowledgements()
            .iter()
            .map(|ack| ack.timestamp)
            .collect()
    }

    pub fn acknowledgements(&self) -> Vec<Acknowledgement> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|request| match request {
                RelayRequest::AcknowledgeDelivery(ack) => Some(ack.clone()),
                RelayRequest::GetMessages => None,
            })
            .collect()
    }
}

#[async_trait]
impl RelayTransport for ScriptedTransport {
    async fn send(&self, request: &RelayRequest) -> Result<Option<Value>> {
        self.requests.lock().unwrap().push(request.clone());
        match request {
            RelayRequest::GetMessages => self
                .pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Some(json!({"messages": []})))),
            RelayRequest::AcknowledgeDelivery(_) if self.fail_acknowledgements => {
                Err(RelayError::Http("acknowledgement refused".to_string()))
            }
            RelayRequest::AcknowledgeDelivery(_) => Ok(None),
        }
    }
}

/// A relay that always has one more page.
#[derive(Default)]
pub struct EndlessTransport {
    fetches: AtomicUsize,
}

impl EndlessTransport {
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayTransport for EndlessTransport {
    async fn send(&self, request: &RelayRequest) -> Result<Option<Value>> {
        tokio::task::yield_now().await;
        match request {
            RelayRequest::GetMessages => {
                let fetch = self.fetches.fetch_add(1, Ordering::SeqCst) as u64;
                page(vec![record(fetch, "busy")], true)
            }
            RelayRequest::AcknowledgeDelivery(_) => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct RecordingReceiver {
    pub seen: Mutex<Vec<Envelope>>,
    pub reject_source: Option<String>,
}

impl RecordingReceiver {
    pub fn rejecting(source: &str) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            reject_source: Some(source.to_string()),
        }
    }

    pub fn timestamps(&self) -> Vec<u64> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|envelope| envelope.timestamp)
            .collect()
    }
}

#[async_trait]
impl MessageReceiver for RecordingReceiver {
    async fn handle_received_envelope(&self, envelope: Envelope) -> Result<()> {
        let rejected = self.reject_source.as_deref() == Some(envelope.source.as_str());
        self.seen.lock().unwrap().push(envelope);
        if rejected {
            return Err(RelayError::Runtime("receiver refused envelope".to_string()));
        }
        Ok(())
    }
}

pub fn record(timestamp: u64, source: &str) -> Value {
    json!({
        "type": 1,
        "timestamp": timestamp,
        "source": source,
        "sourceDevice": 1,
        "content": "aGVsbG8="
    })
}

pub fn page(records: Vec<Value>, more: bool) -> Result<Option<Value>> {
    Ok(Some(json!({"messages": records, "more": more})))
}

/// Polls `condition` until it holds, failing the test after a second.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never held");
}
