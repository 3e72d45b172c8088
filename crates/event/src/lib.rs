//! The telemetry event record and everything needed to assemble one: the
//! builder, callsite capture and workflow naming.

mod builder;
mod callsite;
mod metadata;
mod workflow;

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;

pub use builder::EventBuilder;
pub use callsite::{Callsite, CallsiteAttributes, function_name_from_type_path};
pub use metadata::MetadataValue;
pub use workflow::{DEFAULT_WORKFLOW, derive_workflow, resolve_workflow};

/// Schema version stamped on every event.
pub const EVENT_VERSION: &str = "1.0";

/// One reported observation of an LLM call, immutable once built.
///
/// Events are fire-and-forget: the collector enforces no unique identity for
/// them, and `request_id` is request-scoped rather than globally stable.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub event_version: &'static str,
    pub timestamp: Timestamp,
    pub agent: String,
    pub workflow: String,
    pub model: String,
    pub provider: String,
    pub request_id: String,
    pub latency_ms: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub retry_count: u32,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub callsite: Option<CallsiteAttributes>,
}

impl Event {
    pub fn builder(agent: impl Into<String>) -> EventBuilder {
        EventBuilder::new(agent)
    }
}

/// Outcome of the instrumented call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}
