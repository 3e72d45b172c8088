//! Adapter for Google generative AI (Gemini) model instances. The
//! intercepted entry point is `generate_content`; unlike the other vendors
//! the model name lives on the instance, not the request, and usage fields
//! are `prompt_token_count` and `candidates_token_count`.

use std::time::Instant;

use async_trait::async_trait;
use event::{Callsite, Event, resolve_workflow};

use crate::{Vigil, error_type_name};

/// Usage contract of a Gemini response (`usage_metadata`). All accessors are
/// optional; absent fields degrade to zeroed counters.
pub trait GenerateContentResponse {
    /// `usage_metadata.prompt_token_count`
    fn prompt_token_count(&self) -> Option<u64> {
        None
    }

    /// `usage_metadata.candidates_token_count`
    fn candidates_token_count(&self) -> Option<u64> {
        None
    }
}

/// The intercepted entry point.
#[async_trait]
pub trait GenerateContent: Send + Sync {
    type Request: Send + Sync;
    type Response: GenerateContentResponse + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of the model this instance is bound to.
    fn model_name(&self) -> Option<&str> {
        None
    }

    async fn generate_content(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}

/// Wraps a Gemini model instance for automatic usage tracking.
pub trait InstrumentGoogle: Sized {
    fn instrument_google(self, telemetry: &Vigil, agent: impl Into<String>) -> InstrumentedGoogle<Self> {
        InstrumentedGoogle {
            inner: self,
            telemetry: telemetry.clone(),
            agent: agent.into(),
            workflow: None,
            callsite: None,
        }
    }
}

impl<C> InstrumentGoogle for C {}

/// A Gemini model instance with telemetry layered on top.
pub struct InstrumentedGoogle<C> {
    inner: C,
    telemetry: Vigil,
    agent: String,
    workflow: Option<String>,
    callsite: Option<Callsite>,
}

impl<C> InstrumentedGoogle<C> {
    /// Re-instrumenting is a no-op; shadows
    /// [`InstrumentGoogle::instrument_google`].
    pub fn instrument_google(self, _telemetry: &Vigil, _agent: impl Into<String>) -> Self {
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
impl<C> GenerateContent for InstrumentedGoogle<C>
where
    C: GenerateContent,
{
    type Request = C::Request;
    type Response = C::Response;
    type Error = C::Error;

    fn model_name(&self) -> Option<&str> {
        self.inner.model_name()
    }

    async fn generate_content(&self, request: Self::Request) -> Result<Self::Response, Self::Error> {
        let model = self.inner.model_name().unwrap_or("gemini-unknown").to_string();
        let started = Instant::now();

        let result = self.inner.generate_content(request).await;

        let workflow = resolve_workflow(
            self.workflow.as_deref(),
            self.telemetry.configured_workflow(),
            self.callsite.as_ref(),
        );

        let mut builder = Event::builder(self.agent.clone())
            .workflow(workflow)
            .model(model)
            .provider("google")
            .latency(started.elapsed());

        if let Some(callsite) = self.callsite.clone() {
            builder = builder.callsite(callsite);
        }

        match &result {
            Ok(response) => {
                builder = builder.usage(
                    response.prompt_token_count().unwrap_or(0),
                    response.candidates_token_count().unwrap_or(0),
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
