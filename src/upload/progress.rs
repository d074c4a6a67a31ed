// ABOUTME: Progress simulation and the per-file upload task.
// ABOUTME: A ProgressTicker fires on a fixed interval until dropped; run_job owns one per attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::WebhookError;
use crate::upload::session::UploadJob;
use crate::webhook::UploadEndpoint;

/// Periodic callback that stops when the guard is dropped.
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Call `tick` every `interval`, starting one interval from now.
    pub fn start<F>(interval: Duration, tick: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            timer.tick().await;
            loop {
                timer.tick().await;
                tick();
            }
        });
        Self { handle }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Perform one upload attempt while a ticker reports simulated progress.
///
/// The ticker is stopped before this returns, on success and on every error path.
pub async fn run_job<F>(
    job: UploadJob,
    endpoint: Arc<dyn UploadEndpoint>,
    interval: Duration,
    tick: F,
) -> Result<(), WebhookError>
where
    F: Fn() + Send + 'static,
{
    let _ticker = ProgressTicker::start(interval, tick);
    let payload = job.read_payload().await?;
    endpoint.upload(payload).await
}
