//! Tokio tasks that talk to the analysis service.
//!
//! The UI loop never awaits the network. It queues [`AnalysisJob`]s on a channel
//! and receives results as [`AppEvent::AnalysisFinished`] on the event bus.
//! Jobs are not coalesced: each one runs in its own task, and the session
//! discards replies that arrive out of order.

use std::sync::Arc;
use std::time::Duration;

use redpen_core::{AnalysisClient, Transport};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::analysis::types::{AnalysisJob, AnalysisReply};
use crate::event::AppEvent;

/// Spawns the task that turns queued jobs into analysis requests.
///
/// Runs until the job sender is dropped. Send errors on `event_tx` are ignored:
/// a closed event bus means the UI is shutting down.
pub fn spawn_analysis_worker<T: Transport + 'static>(
    client: Arc<AnalysisClient<T>>,
    mut jobs: UnboundedReceiver<AnalysisJob>,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = jobs.recv().await {
            let client = Arc::clone(&client);
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                let AnalysisJob { ticket, text } = job;
                tracing::debug!(
                    target: "worker",
                    seq = ticket.seq,
                    chars = text.chars().count(),
                    "analysis started"
                );
                let result = client.analyze(&text).await;
                if let Err(e) = &result {
                    tracing::warn!(
                        target: "worker",
                        seq = ticket.seq,
                        error = %e,
                        "analysis failed"
                    );
                }
                let reply = Box::new(AnalysisReply { ticket, result });
                let _ = event_tx.send(AppEvent::AnalysisFinished(reply));
            });
        }
        tracing::debug!(target: "worker", "job channel closed; analysis worker exiting");
    })
}

/// Spawns the availability poller. The first check runs immediately.
///
/// Any failure is reported as "unavailable"; the indicator is advisory and
/// never blocks analysis.
pub fn spawn_status_poller<T: Transport + 'static>(
    client: Arc<AnalysisClient<T>>,
    every: Duration,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let available = match client.status().await {
                Ok(available) => available,
                Err(e) => {
                    tracing::debug!(target: "worker", error = %e, "status check failed");
                    false
                }
            };
            if event_tx.send(AppEvent::AiStatus(available)).is_err() {
                break;
            }
        }
    })
}
