mod doctor;
mod mock;
mod ping;

use std::time::Duration;

use anyhow::Context;
use config::TelemetryConfig;
use event::Event;
use secrecy::{ExposeSecret, SecretString};

pub(crate) use doctor::doctor;
pub(crate) use mock::mock;
pub(crate) use ping::ping;

fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")
}

async fn post_event(
    client: &reqwest::Client,
    config: &TelemetryConfig,
    event: &Event,
) -> reqwest::Result<reqwest::Response> {
    let mut request = client.post(config.events_url()).json(event);

    if let Some(key) = &config.api_key {
        request = request.bearer_auth(key.expose_secret());
    }

    request.send().await
}

/// Key rendering safe for terminal output: first eight and last four
/// characters, everything else elided.
fn masked_key(key: &SecretString) -> String {
    let chars: Vec<char> = key.expose_secret().chars().collect();

    if chars.len() <= 12 {
        "*".repeat(chars.len())
    } else {
        let prefix: String = chars[..8].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}
