//! Minimal ingestion check with a machine-friendly exit code, meant for
//! onboarding scripts and CI health checks.

use anyhow::{Context, bail};
use config::TelemetryConfig;
use event::Event;

use super::{http_client, post_event};

pub(crate) async fn ping(config: &TelemetryConfig) -> anyhow::Result<()> {
    let event = Event::builder("vigil-cli")
        .workflow("connectivity-ping")
        .model("ping-test")
        .metadata("source", "cli-ping")
        .build();

    let client = http_client()?;

    let response = post_event(&client, config, &event)
        .await
        .with_context(|| format!("failed to reach {}", config.events_url()))?;

    if !response.status().is_success() {
        bail!("the collector refused the ping: HTTP {}", response.status().as_u16());
    }

    println!("Ping accepted (HTTP {}).", response.status().as_u16());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{Router, http::StatusCode, routing::post};
    use config::TelemetryConfig;
    use tokio::net::TcpListener;

    use super::ping;

    async fn collector(status: StatusCode) -> SocketAddr {
        let app = Router::new().route("/api/v1/events", post(move || async move { status }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn test_config(addr: SocketAddr) -> TelemetryConfig {
        TelemetryConfig::builder()
            .api_key("vg_test")
            .endpoint(format!("http://{addr}").parse().unwrap())
            .build()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn accepted_ping_succeeds() {
        let addr = collector(StatusCode::OK).await;
        ping(&test_config(addr)).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn refused_ping_fails() {
        let addr = collector(StatusCode::UNAUTHORIZED).await;
        assert!(ping(&test_config(addr)).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_collector_fails() {
        let config = TelemetryConfig::builder()
            .api_key("vg_test")
            .endpoint("http://127.0.0.1:1".parse().unwrap())
            .build();

        assert!(ping(&config).await.is_err());
    }
}
