use std::time::Duration;

use serde::Deserialize;

/// Tuning knobs for the background event dispatcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum number of concurrent delivery attempts.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Maximum number of accepted-but-unsent events. Submissions beyond this
    /// are dropped (drop-newest), keeping memory bounded under a slow or
    /// unreachable collector.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-request network timeout for a single delivery attempt.
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    pub request_timeout: Duration,
    /// How long the automatic exit-time drain waits for the backlog.
    #[serde(
        default = "default_flush_timeout",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    pub flush_timeout: Duration,
}

fn default_worker_count() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    2048
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_flush_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            queue_capacity: default_queue_capacity(),
            request_timeout: default_request_timeout(),
            flush_timeout: default_flush_timeout(),
        }
    }
}
