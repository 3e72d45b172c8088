//! Configuration for the Vigil telemetry SDK.
//!
//! Values are resolved in order: explicit builder arguments, then environment
//! variables (`VIGIL_API_KEY`, `VIGIL_API_URL`, `VIGIL_WORKFLOW`), then the
//! built-in defaults.

mod dispatch;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

pub use dispatch::DispatchConfig;

pub const DEFAULT_ENDPOINT: &str = "https://app.vigil.dev";

const ENV_API_KEY: &str = "VIGIL_API_KEY";
const ENV_API_URL: &str = "VIGIL_API_URL";
const ENV_WORKFLOW: &str = "VIGIL_WORKFLOW";

/// Telemetry client configuration.
///
/// Read-only after construction; the dispatcher and the adapters only ever
/// borrow it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Bearer token sent with every event. Events are still built and queued
    /// without a key, the collector will simply reject them.
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL of the collector. Endpoint paths are derived from it.
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
    /// Static workflow name used for every event that does not carry an
    /// explicit one. When unset, the workflow is derived from the callsite.
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            workflow: None,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl TelemetryConfig {
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Resolves the whole configuration from the environment.
    pub fn from_env() -> Self {
        Self::builder().build()
    }

    /// Full URL events are POSTed to.
    pub fn events_url(&self) -> Url {
        self.join_path("/api/v1/events")
    }

    /// Onboarding status endpoint used by the `doctor` diagnostic.
    pub fn onboarding_status_url(&self) -> Url {
        self.join_path("/api/v1/onboarding/status")
    }

    fn join_path(&self, path: &str) -> Url {
        let mut url = self.endpoint.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{path}"));
        url
    }
}

/// Builder resolving unset fields from the environment on `build()`.
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    api_key: Option<SecretString>,
    endpoint: Option<Url>,
    workflow: Option<String>,
    dispatch: Option<DispatchConfig>,
}

impl TelemetryConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn build(self) -> TelemetryConfig {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(ENV_API_KEY).ok().map(SecretString::from));

        let endpoint = self
            .endpoint
            .or_else(|| match std::env::var(ENV_API_URL) {
                Ok(raw) => match Url::parse(&raw) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        log::warn!("Ignoring invalid {ENV_API_URL} ({raw}): {e}");
                        None
                    }
                },
                Err(_) => None,
            })
            .unwrap_or_else(default_endpoint);

        let workflow = self.workflow.or_else(|| std::env::var(ENV_WORKFLOW).ok());

        TelemetryConfig {
            api_key,
            endpoint,
            workflow,
            dispatch: self.dispatch.unwrap_or_default(),
        }
    }
}
