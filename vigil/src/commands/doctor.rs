//! Connectivity diagnosis against the collector's onboarding endpoint.

use config::TelemetryConfig;
use secrecy::ExposeSecret;

use super::{http_client, masked_key};

pub(crate) async fn doctor(config: &TelemetryConfig) -> anyhow::Result<()> {
    println!("Vigil doctor");
    println!();

    match &config.api_key {
        Some(key) => println!("API key:  present ({})", masked_key(key)),
        None => println!("API key:  missing"),
    }
    println!("Endpoint: {}", config.endpoint);
    println!();

    let Some(key) = &config.api_key else {
        println!("Set VIGIL_API_KEY before checking connectivity.");
        return Ok(());
    };

    let url = config.onboarding_status_url();
    println!("Checking {url} ...");

    let client = http_client()?;
    let response = client.get(url).bearer_auth(key.expose_secret()).send().await;

    match response {
        Ok(response) if response.status().is_success() => {
            println!("Collector reachable (HTTP {}).", response.status().as_u16());
            println!("Everything looks good.");
        }
        Ok(response) if response.status() == reqwest::StatusCode::UNAUTHORIZED => {
            println!("The collector rejected the API key (HTTP 401).");
            println!("Verify VIGIL_API_KEY against the key shown in the dashboard.");
        }
        Ok(response) => {
            println!("Unexpected collector response: HTTP {}.", response.status().as_u16());
            println!("The endpoint is reachable but not behaving like a Vigil collector.");
            println!("Verify the VIGIL_API_URL value.");
        }
        Err(error) => {
            println!("Request failed: {error}");
            println!("{}", advice(&error));
        }
    }

    Ok(())
}

fn advice(error: &reqwest::Error) -> &'static str {
    // reqwest does not classify TLS failures, so inspect the rendered chain.
    let rendered = format!("{error:?}").to_lowercase();

    if rendered.contains("certificate") || rendered.contains("tls") || rendered.contains("ssl") {
        "TLS verification failed. Check for intercepting proxies or outdated system root certificates."
    } else if error.is_timeout() || error.is_connect() {
        "Could not reach the collector. Check network access, VPN rules and the VIGIL_API_URL value."
    } else {
        "The request failed before a response arrived. Retry with `--log debug` for details."
    }
}
