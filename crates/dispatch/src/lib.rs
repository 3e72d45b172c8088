//! Background delivery of telemetry events.
//!
//! The dispatcher is the only concurrent component of the SDK: it accepts
//! finished events without blocking the caller and POSTs them to the
//! collector from a bounded worker pool running on its own thread. Delivery
//! is best effort and at-most-once; nothing that happens here is ever
//! surfaced to the instrumented application.

mod environment;
mod gauge;
mod http_client;
mod worker;

use std::{sync::Arc, time::Duration};

use config::TelemetryConfig;
use event::Event;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use gauge::PendingGauge;
use worker::DeliveryContext;

pub use environment::is_serverless;

/// Errors that can occur while setting up the dispatcher. Once constructed,
/// the dispatcher itself never fails towards the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to start dispatch runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Handle to the background delivery pipeline. Cloning is cheap and all
/// clones feed the same queue; the pipeline shuts down when the last clone is
/// dropped.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

struct Shared {
    tx: Option<mpsc::Sender<Event>>,
    pending: Arc<PendingGauge>,
    cancellation: CancellationToken,
    worker: Option<std::thread::JoinHandle<()>>,
    flush_timeout: Duration,
    exit_drain: bool,
}

impl Dispatcher {
    /// Starts the background worker thread with its own single-threaded tokio
    /// runtime, so submission works from synchronous and asynchronous hosts
    /// alike.
    pub fn new(config: &TelemetryConfig) -> Result<Self, DispatchError> {
        let context = DeliveryContext::new(config)?;
        let (tx, rx) = mpsc::channel(config.dispatch.queue_capacity);

        let pending = Arc::new(PendingGauge::default());
        let cancellation = CancellationToken::new();

        let worker = worker::spawn(
            rx,
            context,
            config.dispatch.worker_count,
            pending.clone(),
            cancellation.clone(),
        )?;

        Ok(Self {
            shared: Arc::new(Shared {
                tx: Some(tx),
                pending,
                cancellation,
                worker: Some(worker),
                flush_timeout: config.dispatch.flush_timeout,
                exit_drain: !environment::is_serverless(),
            }),
        })
    }

    /// Queues an event for background delivery and returns immediately.
    ///
    /// Never blocks and never fails towards the caller: when the queue is
    /// full the event is dropped (drop-newest) with a local warning, and the
    /// same goes for a dispatcher that has already shut down.
    pub fn submit(&self, event: Event) {
        let Some(tx) = self.shared.tx.as_ref() else {
            // Only reachable mid-teardown.
            return;
        };

        self.shared.pending.increment();

        if let Err(err) = tx.try_send(event) {
            self.shared.pending.decrement();

            match err {
                mpsc::error::TrySendError::Full(_) => {
                    log::warn!("Telemetry queue full, dropping event");
                }
                mpsc::error::TrySendError::Closed(_) => {
                    log::warn!("Telemetry dispatcher is shut down, dropping event");
                }
            }
        }
    }

    /// Blocks the calling thread until every event accepted before this call
    /// has finished its delivery attempt, or the timeout elapses.
    ///
    /// Returns `true` when the backlog fully drained. The worker pool stays
    /// armed either way, so the dispatcher keeps accepting submissions
    /// afterwards.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.shared.pending.wait_drained(timeout)
    }

    /// Number of accepted events whose delivery attempt has not finished yet.
    pub fn pending(&self) -> u64 {
        self.shared.pending.current()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Serverless platforms may freeze the process right after the handler
        // returns, so an exit-time drain cannot be relied on there; callers
        // flush explicitly instead.
        if self.exit_drain && !self.pending.wait_drained(self.flush_timeout) {
            log::warn!(
                "Telemetry drain timed out after {:?}, {} event(s) lost",
                self.flush_timeout,
                self.pending.current()
            );
        }

        // Closing the channel ends the dispatch loop; cancellation aborts any
        // backlog that outlived the drain timeout.
        drop(self.tx.take());
        self.cancellation.cancel();

        if self.exit_drain
            && let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::warn!("Telemetry worker thread panicked during shutdown");
        }
    }
}
