use std::{collections::BTreeMap, time::Duration};

use jiff::Timestamp;
use uuid::Uuid;

use crate::{Callsite, Event, EVENT_VERSION, MetadataValue, Status};

/// Assembles an [`Event`], stamping the generated fields (`event_version`,
/// `timestamp`, `request_id`) and enforcing the defaults: zero tokens, zero
/// retries, `success` status, `unknown` model.
#[derive(Debug)]
pub struct EventBuilder {
    agent: String,
    workflow: Option<String>,
    model: Option<String>,
    provider: Option<String>,
    request_id: Option<String>,
    latency_ms: u64,
    input_tokens: u64,
    output_tokens: u64,
    retry_count: u32,
    status: Status,
    error_type: Option<String>,
    metadata: BTreeMap<String, MetadataValue>,
    callsite: Option<Callsite>,
}

impl EventBuilder {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            workflow: None,
            model: None,
            provider: None,
            request_id: None,
            latency_ms: 0,
            input_tokens: 0,
            output_tokens: 0,
            retry_count: 0,
            status: Status::Success,
            error_type: None,
            metadata: BTreeMap::new(),
            callsite: None,
        }
    }

    pub fn workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Overrides the locally generated request id, typically with a
    /// provider-assigned one.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self
    }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Marks the event as failed, recording the error classification and
    /// putting the message under `metadata.error_message`.
    pub fn error(mut self, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        self.status = Status::Error;
        self.error_type = Some(error_type.into());
        self.metadata
            .insert("error_message".to_string(), MetadataValue::from(message.into()));
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn callsite(mut self, callsite: Callsite) -> Self {
        self.callsite = Some(callsite);
        self
    }

    pub fn build(self) -> Event {
        Event {
            event_version: EVENT_VERSION,
            timestamp: Timestamp::now(),
            agent: self.agent,
            workflow: self
                .workflow
                .unwrap_or_else(|| crate::derive_workflow(self.callsite.as_ref())),
            model: self.model.unwrap_or_else(|| "unknown".to_string()),
            provider: self.provider.unwrap_or_else(|| "other".to_string()),
            request_id: self
                .request_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            latency_ms: self.latency_ms,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            retry_count: self.retry_count,
            status: self.status,
            error_type: self.error_type,
            metadata: self.metadata,
            callsite: self.callsite.map(Callsite::into_attributes),
        }
    }
}
