//! Sends one realistic sample event so a new installation can verify the
//! ingestion path before wiring up real instrumentation.

use std::time::Duration;

use config::TelemetryConfig;
use event::Event;

use super::{http_client, post_event};

pub(crate) async fn mock(config: &TelemetryConfig) -> anyhow::Result<()> {
    let event = Event::builder("vigil-cli-mock")
        .workflow("diagnostic-mock")
        .model("gpt-4o")
        .provider("openai")
        .usage(150, 450)
        .latency(Duration::from_millis(1200))
        .metadata("source", "cli-mock")
        .build();

    println!("Sending mock event to {} ...", config.events_url());

    let client = http_client()?;

    match post_event(&client, config, &event).await {
        Ok(response) if response.status().is_success() => {
            println!("Mock event accepted (HTTP {}).", response.status().as_u16());
            println!("It should appear in the dashboard within a few seconds.");
        }
        Ok(response) => {
            println!("The collector refused the event: HTTP {}.", response.status().as_u16());
        }
        Err(error) => {
            println!("Delivery failed: {error}");
        }
    }

    Ok(())
}
