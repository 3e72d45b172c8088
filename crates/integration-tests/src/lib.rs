//! Test harness for exercising the SDK end to end: an in-process collector
//! stub recording every delivered event, plus mock vendor clients for the
//! adapter wrappers.

pub mod clients;

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use config::TelemetryConfig;
use instrument::Vigil;
use tokio::net::TcpListener;

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

/// In-process stand-in for the ingestion API. Records the JSON body of every
/// event POSTed to it and answers with a fixed status.
#[derive(Clone)]
pub struct TestCollector {
    addr: SocketAddr,
    received: Received,
}

impl TestCollector {
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::CREATED).await
    }

    pub async fn start_with_status(status: StatusCode) -> Self {
        let received: Received = Arc::default();

        let app = Router::new()
            .route(
                "/api/v1/events",
                post(
                    move |State(received): State<Received>, Json(body): Json<serde_json::Value>| async move {
                        received.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .route(
                "/api/v1/onboarding/status",
                get(|| async { Json(serde_json::json!({ "onboarded": true })) }),
            )
            .with_state(received.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    pub fn config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .api_key("vg_test_key")
            .endpoint(format!("http://{}", self.addr).parse().unwrap())
            .build()
    }

    /// A telemetry handle pointed at this collector.
    pub fn telemetry(&self) -> Vigil {
        Vigil::new(self.config()).unwrap()
    }

    pub fn events(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }

    /// Polls until at least `count` events arrived, panicking after five
    /// seconds. Delivery is asynchronous even after a successful flush of the
    /// sender side, hence polling instead of a fixed sleep.
    pub async fn wait_for_events(&self, count: usize) -> Vec<serde_json::Value> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

        loop {
            let events = self.events();

            if events.len() >= count {
                return events;
            }

            if tokio::time::Instant::now() > deadline {
                panic!("expected {count} event(s), collector received {}", events.len());
            }

            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

/// Flushes without blocking the async test runtime.
pub async fn flush(telemetry: &Vigil) -> bool {
    let telemetry = telemetry.clone();

    tokio::task::spawn_blocking(move || telemetry.flush(Duration::from_secs(5)))
        .await
        .unwrap()
}
