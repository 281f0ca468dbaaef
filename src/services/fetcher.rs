use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domains::envelope::{Acknowledgement, FetchBatch};
use crate::error::Result;
use crate::interfaces::receiver::MessageReceiver;
use crate::interfaces::scheduler::ScheduledJob;
use crate::interfaces::transport::{RelayRequest, RelayTransport};
use crate::services::decoder::parse_messages_response;
use crate::services::retain::{retain_until_complete, RetainedTask};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Fired once when a drain finishes with the relay reporting nothing more.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Sends acknowledgements one at a time, in the order they were queued.
struct AcknowledgementWorker {
    queue: mpsc::UnboundedSender<Acknowledgement>,
    handle: JoinHandle<()>,
}

impl AcknowledgementWorker {
    fn start(transport: Arc<dyn RelayTransport>) -> Self {
        let (queue, mut pending) = mpsc::unbounded_channel::<Acknowledgement>();
        let handle = tokio::spawn(async move {
            while let Some(acknowledgement) = pending.recv().await {
                let source = acknowledgement.source.clone();
                let timestamp = acknowledgement.timestamp;
                match transport
                    .send(&RelayRequest::AcknowledgeDelivery(acknowledgement))
                    .await
                {
                    Ok(_) => debug!(%source, timestamp, "acknowledged delivery"),
                    Err(err) => warn!(
                        %source,
                        timestamp,
                        error = %err,
                        "delivery acknowledgement failed"
                    ),
                }
            }
        });
        Self { queue, handle }
    }
}

/// Drains undelivered messages from the relay.
///
/// Each page is delivered to the receiver in server order and every envelope
/// is acknowledged in the same order, without waiting for the outcome.
/// Delivery is at least once: an envelope handled but not acknowledged comes
/// back on the next drain.
pub struct MessageFetcherJob {
    transport: Arc<dyn RelayTransport>,
    receiver: Arc<dyn MessageReceiver>,
    interval: Duration,
    acknowledgements: Mutex<Option<AcknowledgementWorker>>,
}

impl MessageFetcherJob {
    pub fn new(transport: Arc<dyn RelayTransport>, receiver: Arc<dyn MessageReceiver>) -> Self {
        Self {
            transport,
            receiver,
            interval: DEFAULT_POLL_INTERVAL,
            acknowledgements: Mutex::new(None),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_secs(1));
        self
    }

    /// Fetches pages until the relay says none remain.
    ///
    /// The first failing page aborts the drain and its error is returned;
    /// `completion` is then never called. Pages already processed stay
    /// processed.
    pub async fn run(&self, completion: Option<Completion>) -> Result<()> {
        let mut pages = 0usize;
        let mut delivered = 0usize;

        loop {
            let batch = match self.fetch_undelivered_messages().await {
                Ok(batch) => batch,
                Err(err) => {
                    warn!(pages, error = %err, "message drain aborted");
                    return Err(err);
                }
            };
            pages += 1;
            debug!(
                page = pages,
                envelopes = batch.envelopes.len(),
                more = batch.more,
                "fetched message page"
            );

            for envelope in batch.envelopes {
                let acknowledgement = envelope.acknowledgement();
                if let Err(err) = self.receiver.handle_received_envelope(envelope).await {
                    warn!(
                        source = %acknowledgement.source,
                        timestamp = acknowledgement.timestamp,
                        error = %err,
                        "message receiver rejected envelope"
                    );
                }
                self.acknowledge_delivery(acknowledgement);
                delivered += 1;
            }

            if !batch.more {
                break;
            }
        }

        info!(pages, delivered, "message drain complete");
        if let Some(completion) = completion {
            completion();
        }
        Ok(())
    }

    /// Runs a drain on the tokio runtime. The returned handle may be awaited
    /// or dropped; the drain continues either way.
    pub fn spawn(self: &Arc<Self>, completion: Option<Completion>) -> RetainedTask<()> {
        let job = Arc::clone(self);
        retain_until_complete(async move { job.run(completion).await })
    }

    /// Waits for acknowledgements still in flight. Drains never call this;
    /// it exists for callers about to shut the runtime down.
    pub async fn flush_acknowledgements(&self) {
        let worker = self.acknowledgement_worker().take();
        if let Some(AcknowledgementWorker { queue, handle }) = worker {
            // Closing the queue lets the worker finish what is already queued.
            drop(queue);
            let _ = handle.await;
        }
    }

    fn acknowledgement_worker(&self) -> MutexGuard<'_, Option<AcknowledgementWorker>> {
        self.acknowledgements
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch_undelivered_messages(&self) -> Result<FetchBatch> {
        let response = self.transport.send(&RelayRequest::GetMessages).await?;
        parse_messages_response(response.as_ref())
    }

    fn acknowledge_delivery(&self, acknowledgement: Acknowledgement) {
        let mut worker = self.acknowledgement_worker();
        let worker = worker
            .get_or_insert_with(|| AcknowledgementWorker::start(Arc::clone(&self.transport)));
        if let Err(unsent) = worker.queue.send(acknowledgement) {
            warn!(
                source = %unsent.0.source,
                timestamp = unsent.0.timestamp,
                "acknowledgement worker stopped"
            );
        }
    }
}

#[async_trait]
impl ScheduledJob for MessageFetcherJob {
    fn name(&self) -> &str {
        "message_fetcher"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> Result<()> {
        MessageFetcherJob::run(self, None).await
    }
}
