//! Adapter for Anthropic clients. The intercepted entry point is
//! `create_message`; usage fields are `input_tokens` and `output_tokens`.

use std::time::Instant;

use async_trait::async_trait;
use event::{Callsite, Event, resolve_workflow};

use crate::{RequestModel, Vigil, error_type_name};

/// Usage contract of an Anthropic messages response. All accessors are
/// optional; absent fields degrade to zeroed counters.
pub trait MessagesResponse {
    /// `usage.input_tokens`
    fn input_tokens(&self) -> Option<u64> {
        None
    }

    /// `usage.output_tokens`
    fn output_tokens(&self) -> Option<u64> {
        None
    }
}

/// The intercepted entry point.
#[async_trait]
pub trait Messages: Send + Sync {
    type Request: RequestModel + Send + Sync;
    type Response: MessagesResponse + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create_message(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}

/// Wraps an Anthropic client for automatic usage tracking.
pub trait InstrumentAnthropic: Sized {
    fn instrument_anthropic(self, telemetry: &Vigil, agent: impl Into<String>) -> InstrumentedAnthropic<Self> {
        InstrumentedAnthropic {
            inner: self,
            telemetry: telemetry.clone(),
            agent: agent.into(),
            workflow: None,
            callsite: None,
        }
    }
}

impl<C> InstrumentAnthropic for C {}

/// An Anthropic client with telemetry layered on top.
pub struct InstrumentedAnthropic<C> {
    inner: C,
    telemetry: Vigil,
    agent: String,
    workflow: Option<String>,
    callsite: Option<Callsite>,
}

impl<C> InstrumentedAnthropic<C> {
    /// Re-instrumenting is a no-op; shadows
    /// [`InstrumentAnthropic::instrument_anthropic`].
    pub fn instrument_anthropic(self, _telemetry: &Vigil, _agent: impl Into<String>) -> Self {
        self
    }

    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    pub fn with_callsite(mut self, callsite: Callsite) -> Self {
        self.callsite = Some(callsite);
        self
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C> Messages for InstrumentedAnthropic<C>
where
    C: Messages,
{
    type Request = C::Request;
    type Response = C::Response;
    type Error = C::Error;

    async fn create_message(&self, request: Self::Request) -> Result<Self::Response, Self::Error> {
        let model = request.model().unwrap_or("unknown").to_string();
        let started = Instant::now();

        let result = self.inner.create_message(request).await;

        let workflow = resolve_workflow(
            self.workflow.as_deref(),
            self.telemetry.configured_workflow(),
            self.callsite.as_ref(),
        );

        let mut builder = Event::builder(self.agent.clone())
            .workflow(workflow)
            .model(model)
            .provider("anthropic")
            .latency(started.elapsed());

        if let Some(callsite) = self.callsite.clone() {
            builder = builder.callsite(callsite);
        }

        match &result {
            Ok(response) => {
                builder = builder.usage(
                    response.input_tokens().unwrap_or(0),
                    response.output_tokens().unwrap_or(0),
                );
            }
            Err(error) => {
                builder = builder.error(error_type_name::<C::Error>(), error.to_string());
            }
        }

        self.telemetry.submit(builder.build());
        result
    }
}
