use std::{collections::BTreeMap, time::Instant};

use event::{Callsite, Event, MetadataValue, resolve_workflow};

use crate::Vigil;

/// Mutable handle for one manually tracked LLM call.
///
/// Created by [`Vigil::track`]; the timer starts at creation and the event is
/// built from the final state and submitted when the tracker is dropped.
/// Submission is fail-safe, so dropping the tracker can never disturb the
/// surrounding application.
pub struct TrackedOperation {
    telemetry: Vigil,
    agent: String,
    workflow: Option<String>,
    model: Option<String>,
    provider: Option<String>,
    input_tokens: u64,
    output_tokens: u64,
    retry_count: u32,
    metadata: BTreeMap<String, MetadataValue>,
    error: Option<(String, String)>,
    callsite: Callsite,
    started: Instant,
}

impl TrackedOperation {
    pub(crate) fn new(telemetry: Vigil, agent: String, callsite: Callsite) -> Self {
        Self {
            telemetry,
            agent,
            workflow: None,
            model: None,
            provider: None,
            input_tokens: 0,
            output_tokens: 0,
            retry_count: 0,
            metadata: BTreeMap::new(),
            error: None,
            callsite,
            started: Instant::now(),
        }
    }

    pub fn set_workflow(&mut self, workflow: impl Into<String>) {
        self.workflow = Some(workflow.into());
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = Some(model.into());
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.provider = Some(provider.into());
    }

    pub fn set_usage(&mut self, input_tokens: u64, output_tokens: u64) {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
    }

    pub fn set_retry(&mut self, count: u32) {
        self.retry_count = count;
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Forces the outcome to `error`, classifying by the error's type name
    /// and recording its message under `metadata.error_message`.
    pub fn record_error<E: std::error::Error + ?Sized>(&mut self, error: &E) {
        self.error = Some((crate::error_type_name::<E>().to_string(), error.to_string()));
    }

    /// Runs the fallible body of the operation. An `Err` marks the event as
    /// failed and is handed back unchanged once the event is queued, exactly
    /// like an exception propagating out of a tracking scope.
    pub fn in_scope<T, E>(mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E>
    where
        E: std::error::Error,
    {
        let result = f(&mut self);

        if let Err(error) = &result {
            self.record_error(error);
        }

        result
    }
}

impl Drop for TrackedOperation {
    fn drop(&mut self) {
        let workflow = resolve_workflow(
            self.workflow.as_deref(),
            self.telemetry.configured_workflow(),
            Some(&self.callsite),
        );

        let mut builder = Event::builder(std::mem::take(&mut self.agent))
            .workflow(workflow)
            .provider(self.provider.take().unwrap_or_else(|| "other".to_string()))
            .latency(self.started.elapsed())
            .usage(self.input_tokens, self.output_tokens)
            .retry_count(self.retry_count)
            .callsite(self.callsite.clone());

        if let Some(model) = self.model.take() {
            builder = builder.model(model);
        }

        if let Some((error_type, message)) = self.error.take() {
            builder = builder.error(error_type, message);
        }

        for (key, value) in std::mem::take(&mut self.metadata) {
            builder = builder.metadata(key, value);
        }

        self.telemetry.submit(builder.build());
    }
}
