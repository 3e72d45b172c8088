use std::time::Duration;

use reqwest::Client;

/// Client builder for telemetry delivery.
///
/// Keep-alive matters here: a chatty instrumented application delivers many
/// small events to the same collector host, so connection reuse is the
/// common case.
pub(crate) fn default_http_client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
}
