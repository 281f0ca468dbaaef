use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::interfaces::scheduler::ScheduledJob;

/// Runs each registered job on its own interval until stopped.
///
/// A job's next run starts only after its previous run returned, so one job
/// never overlaps itself. `stop` abandons a run that is still in progress.
pub struct Scheduler {
    jobs: Vec<Arc<dyn ScheduledJob>>,
    handles: Vec<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            shutdown: None,
        }
    }

    pub fn register_job(&mut self, job: Arc<dyn ScheduledJob>) {
        self.jobs.push(job);
    }

    pub fn start(&mut self) {
        if self.shutdown.is_some() {
            return;
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = shutdown_rx.clone();
            self.handles.push(tokio::spawn(async move {
                let mut tick = tokio::time::interval(job.interval());
                tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.changed() => break,
                        _ = tick.tick() => {}
                    }
                    debug!(job = job.name(), "running scheduled job");
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.changed() => {
                            debug!(job = job.name(), "scheduled job interrupted by shutdown");
                            break;
                        }
                        result = job.run() => {
                            if let Err(err) = result {
                                warn!(job = job.name(), error = %err, "scheduled job failed");
                            }
                        }
                    }
                }
            }));
        }
        self.shutdown = Some(shutdown_tx);
    }

    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }
}
