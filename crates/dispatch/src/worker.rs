use std::sync::Arc;

use config::TelemetryConfig;
use event::Event;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Semaphore, mpsc};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use url::Url;

use crate::{DispatchError, gauge::PendingGauge};

/// Everything a delivery attempt needs; shared by all workers.
pub(crate) struct DeliveryContext {
    client: Client,
    events_url: Url,
    api_key: Option<SecretString>,
    request_timeout: std::time::Duration,
}

impl DeliveryContext {
    pub(crate) fn new(config: &TelemetryConfig) -> Result<Self, DispatchError> {
        let client = crate::http_client::default_http_client_builder()
            .build()
            .map_err(DispatchError::HttpClient)?;

        Ok(Self {
            client,
            events_url: config.events_url(),
            api_key: config.api_key.clone(),
            request_timeout: config.dispatch.request_timeout,
        })
    }

    /// One best-effort POST of the JSON-encoded event. At-most-once: every
    /// failure mode ends here, logged locally and otherwise swallowed.
    async fn deliver(&self, event: Event) {
        let mut request = self
            .client
            .post(self.events_url.clone())
            .timeout(self.request_timeout)
            .json(&event);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        match request.send().await {
            Ok(response) if matches!(response.status().as_u16(), 200 | 201) => {
                log::trace!("Delivered telemetry event {}", event.request_id);
            }
            Ok(response) => {
                log::debug!(
                    "Collector rejected telemetry event {} with status {}",
                    event.request_id,
                    response.status()
                );
            }
            Err(e) => {
                log::debug!("Failed to deliver telemetry event {}: {e}", event.request_id);
            }
        }
    }
}

/// Spawns the dispatch thread: a single-threaded tokio runtime driving the
/// receive loop, with delivery attempts fanned out under a semaphore capped
/// at `worker_count`.
pub(crate) fn spawn(
    rx: mpsc::Receiver<Event>,
    context: DeliveryContext,
    worker_count: usize,
    pending: Arc<PendingGauge>,
    cancellation: CancellationToken,
) -> Result<std::thread::JoinHandle<()>, DispatchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(DispatchError::Runtime)?;

    std::thread::Builder::new()
        .name("vigil-dispatch".to_string())
        .spawn(move || {
            runtime.block_on(run(rx, Arc::new(context), worker_count, pending, cancellation));
            // Dropping the runtime here aborts any delivery that survived
            // cancellation.
        })
        .map_err(DispatchError::Runtime)
}

async fn run(
    mut rx: mpsc::Receiver<Event>,
    context: Arc<DeliveryContext>,
    worker_count: usize,
    pending: Arc<PendingGauge>,
    cancellation: CancellationToken,
) {
    let workers = Arc::new(Semaphore::new(worker_count.max(1)));
    let in_flight = TaskTracker::new();

    loop {
        let event = tokio::select! {
            _ = cancellation.cancelled() => break,
            event = rx.recv() => match event {
                Some(event) => event,
                // All senders gone: drain whatever is in flight and exit.
                None => break,
            },
        };

        let permit = tokio::select! {
            _ = cancellation.cancelled() => {
                pending.decrement();
                break;
            }
            permit = workers.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let context = context.clone();
        let pending = pending.clone();

        in_flight.spawn(async move {
            context.deliver(event).await;
            drop(permit);
            pending.decrement();
        });
    }

    in_flight.close();

    if !cancellation.is_cancelled() {
        in_flight.wait().await;
    }
}
