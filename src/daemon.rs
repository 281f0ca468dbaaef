use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::interfaces::receiver::MessageReceiver;
use crate::scheduler::Scheduler;
use crate::services::fetcher::MessageFetcherJob;
use crate::services::receiver::LoggingReceiver;
use crate::services::transport::HttpRelayTransport;

pub fn build_fetcher(
    config: &Config,
    receiver: Arc<dyn MessageReceiver>,
) -> Result<Arc<MessageFetcherJob>> {
    let transport = Arc::new(HttpRelayTransport::new(&config.relay)?);
    Ok(Arc::new(
        MessageFetcherJob::new(transport, receiver).with_interval(config.poll_interval()),
    ))
}

/// Polls the relay on the configured interval until `shutdown` resolves.
pub async fn run<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let fetcher = build_fetcher(&config, Arc::new(LoggingReceiver))?;
    let mut scheduler = Scheduler::new();
    scheduler.register_job(fetcher.clone());
    scheduler.start();
    info!(
        relay = %config.relay.base_url,
        poll_seconds = config.poll_interval().as_secs(),
        "message polling started"
    );

    shutdown.await;
    scheduler.stop().await;
    fetcher.flush_acknowledgements().await;
    info!("message polling stopped");
    Ok(())
}
