//! Background delivery of best-effort side effects.
//!
//! Notifications and exchange rows travel on separate bounded lanes, so a
//! slow sheet never holds up a push. Each lane delivers in order, bounds every
//! job with a timeout, and runs it on its own task: a collaborator that panics
//! loses that one job, not the lane. When a lane is full, new jobs are dropped
//! with a warning. The worker exits once every `Outbox` handle has been
//! dropped and both lanes are drained.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use folio_core::{ExchangeLog, Notifier};

/// Default per-lane queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

const NOTIFY_DEADLINE: Duration = Duration::from_secs(10);
const EXCHANGE_DEADLINE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExchangeEntry {
    timestamp: String,
    message: String,
    answer: String,
}

#[derive(Clone)]
pub struct Outbox {
    notify_tx: mpsc::Sender<String>,
    exchange_tx: mpsc::Sender<ExchangeEntry>,
}

impl Outbox {
    /// Start the delivery worker with [`DEFAULT_QUEUE_CAPACITY`]. Await the
    /// handle after dropping every `Outbox` clone to flush pending jobs.
    pub fn spawn(
        notifier: Arc<dyn Notifier>,
        exchange_log: Arc<dyn ExchangeLog>,
    ) -> (Self, JoinHandle<()>) {
        Self::with_capacity(notifier, exchange_log, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(
        notifier: Arc<dyn Notifier>,
        exchange_log: Arc<dyn ExchangeLog>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (notify_tx, notify_rx) = mpsc::channel(capacity);
        let (exchange_tx, exchange_rx) = mpsc::channel(capacity);

        info!(
            notifier = notifier.name(),
            exchange_log = exchange_log.name(),
            capacity,
            "Outbox worker started"
        );

        let notifications = tokio::spawn(run_lane("notify", notify_rx, move |text: String| {
            let notifier = notifier.clone();
            async move {
                debug!("Attempting to send push notification");
                match tokio::time::timeout(NOTIFY_DEADLINE, notifier.notify(&text)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "Error sending push notification"),
                    Err(_) => warn!("Push notification timed out"),
                }
            }
        }));

        let exchanges = tokio::spawn(run_lane(
            "exchange",
            exchange_rx,
            move |entry: ExchangeEntry| {
                let exchange_log = exchange_log.clone();
                async move {
                    let append =
                        exchange_log.append(&entry.timestamp, &entry.message, &entry.answer);
                    match tokio::time::timeout(EXCHANGE_DEADLINE, append).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!(error = %e, "Error writing exchange log"),
                        Err(_) => warn!("Exchange log append timed out"),
                    }
                }
            },
        ));

        let handle = tokio::spawn(async move {
            let (notifications, exchanges) = tokio::join!(notifications, exchanges);
            if let Err(e) = notifications.and(exchanges) {
                error!(error = %e, "Outbox lane aborted");
            }
            info!("Outbox worker stopped");
        });

        (
            Self {
                notify_tx,
                exchange_tx,
            },
            handle,
        )
    }

    /// Queue a push notification. Returns whether the job was accepted.
    pub fn notify(&self, text: impl Into<String>) -> bool {
        enqueue("notify", &self.notify_tx, text.into())
    }

    /// Queue a completed exchange, stamped with the current local time.
    /// Returns whether the job was accepted.
    pub fn record_exchange(&self, message: impl Into<String>, answer: impl Into<String>) -> bool {
        let entry = ExchangeEntry {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            message: message.into(),
            answer: answer.into(),
        };
        enqueue("exchange", &self.exchange_tx, entry)
    }
}

fn enqueue<J>(lane: &'static str, tx: &mpsc::Sender<J>, job: J) -> bool {
    match tx.try_send(job) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(lane, "Outbox queue full, dropping outbound job");
            false
        }
        Err(TrySendError::Closed(_)) => {
            warn!(lane, "Outbox worker has stopped, dropping outbound job");
            false
        }
    }
}

async fn run_lane<J, F, Fut>(lane: &'static str, mut rx: mpsc::Receiver<J>, deliver: F)
where
    J: Send + 'static,
    F: Fn(J) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    while let Some(job) = rx.recv().await {
        if let Err(e) = tokio::spawn(deliver(job)).await {
            error!(lane, error = %e, "Outbound delivery panicked, job lost");
        }
    }
    debug!(lane, "Outbox lane drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RecordingExchangeLog, RecordingNotifier};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Exchange log whose append never completes.
    struct StalledLog;

    #[async_trait]
    impl ExchangeLog for StalledLog {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn append(&self, _timestamp: &str, _message: &str, _answer: &str) -> Result<()> {
            std::future::pending::<Result<()>>().await
        }
    }

    /// Panics on the first append, then records normally.
    struct PanicsOnceLog {
        panicked: AtomicBool,
        inner: RecordingExchangeLog,
    }

    #[async_trait]
    impl ExchangeLog for PanicsOnceLog {
        fn name(&self) -> &str {
            "panics_once"
        }

        async fn append(&self, timestamp: &str, message: &str, answer: &str) -> Result<()> {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("token deadline overflow");
            }
            self.inner.append(timestamp, message, answer).await
        }
    }

    #[tokio::test]
    async fn delivers_jobs_in_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let log = Arc::new(RecordingExchangeLog::new());
        let (outbox, worker) = Outbox::spawn(notifier.clone(), log.clone());

        assert!(outbox.notify("first"));
        assert!(outbox.notify("second"));
        assert!(outbox.record_exchange("What is your name?", "Sandeep Patel here!"));
        drop(outbox);
        worker.await.unwrap();

        assert_eq!(notifier.sent(), vec!["first", "second"]);
        let rows = log.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "What is your name?");
        assert_eq!(rows[0].answer, "Sandeep Patel here!");
        assert_eq!(rows[0].timestamp.len(), "2024-01-01 00:00:00".len());
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_worker() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let log = Arc::new(RecordingExchangeLog::failing());
        let (outbox, worker) = Outbox::spawn(notifier.clone(), log.clone());

        outbox.notify("one");
        outbox.record_exchange("q", "a");
        outbox.notify("two");
        drop(outbox);
        worker.await.unwrap();

        assert_eq!(notifier.sent(), vec!["one", "two"]);
        assert_eq!(log.rows().len(), 1);
    }

    #[tokio::test]
    async fn stalled_exchange_log_does_not_delay_notifications() {
        let notifier = Arc::new(RecordingNotifier::new());
        let (outbox, _worker) = Outbox::spawn(notifier.clone(), Arc::new(StalledLog));

        outbox.record_exchange("q", "a");
        outbox.notify("contact: x@y.com");

        let delivered = tokio::time::timeout(Duration::from_secs(2), async {
            while notifier.sent().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(delivered.is_ok(), "notification waited behind the exchange log");
        assert_eq!(notifier.sent(), vec!["contact: x@y.com"]);
    }

    #[tokio::test]
    async fn full_lane_drops_new_jobs() {
        let notifier = Arc::new(RecordingNotifier::new());
        let (outbox, _worker) = Outbox::with_capacity(notifier, Arc::new(StalledLog), 2);

        let accepted = (0..10)
            .filter(|i| outbox.record_exchange(format!("q{i}"), "a"))
            .count();
        // Capacity plus at most one job already taken by the stalled lane.
        assert!((2..=3).contains(&accepted), "accepted {accepted} jobs");

        assert!(outbox.notify("other lane still accepts"));
    }

    #[tokio::test]
    async fn panicking_collaborator_loses_only_its_job() {
        let notifier = Arc::new(RecordingNotifier::new());
        let log = Arc::new(PanicsOnceLog {
            panicked: AtomicBool::new(false),
            inner: RecordingExchangeLog::new(),
        });
        let (outbox, worker) = Outbox::spawn(notifier.clone(), log.clone());

        outbox.record_exchange("first", "lost");
        outbox.notify("after panic");
        outbox.record_exchange("second", "kept");
        drop(outbox);

        assert!(worker.await.is_ok());
        assert_eq!(notifier.sent(), vec!["after panic"]);
        let rows = log.inner.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "second");
    }
}
