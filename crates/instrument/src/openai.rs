//! Adapter for OpenAI-compatible chat clients (OpenAI itself, but also
//! DeepSeek, Groq and other clones of the API). The single intercepted entry
//! point is `create_chat_completion`; this is the one adapter with both an
//! asynchronous and a blocking call path.

use std::time::Instant;

use async_trait::async_trait;
use event::{Callsite, Event, resolve_workflow};

use crate::{RequestModel, Vigil, error_type_name};

/// Usage contract of an OpenAI-style response. Vendors evolve their response
/// shapes, so every accessor is optional; absent fields degrade to zeroed
/// counters, never to an error.
pub trait ChatCompletionsResponse {
    /// `usage.prompt_tokens`
    fn prompt_tokens(&self) -> Option<u64> {
        None
    }

    /// `usage.completion_tokens`
    fn completion_tokens(&self) -> Option<u64> {
        None
    }

    /// Provider-assigned response id. When present it replaces the locally
    /// generated `request_id` on the event.
    fn response_id(&self) -> Option<&str> {
        None
    }
}

/// The intercepted asynchronous entry point.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    type Request: RequestModel + Send + Sync;
    type Response: ChatCompletionsResponse + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create_chat_completion(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}

/// The intercepted blocking entry point.
pub trait ChatCompletionsBlocking {
    type Request: RequestModel;
    type Response: ChatCompletionsResponse;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_chat_completion(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}

/// Wraps an OpenAI-compatible client for automatic usage tracking.
pub trait InstrumentOpenAi: Sized {
    fn instrument_openai(self, telemetry: &Vigil, agent: impl Into<String>) -> InstrumentedOpenAi<Self> {
        InstrumentedOpenAi {
            inner: self,
            telemetry: telemetry.clone(),
            agent: agent.into(),
            workflow: None,
            callsite: None,
        }
    }
}

impl<C> InstrumentOpenAi for C {}

/// An OpenAI-compatible client with telemetry layered on top. Implements the
/// same call traits as the wrapped client: timing spans the delegated call,
/// usage is extracted on success, failures are reported and re-raised
/// unchanged.
pub struct InstrumentedOpenAi<C> {
    inner: C,
    telemetry: Vigil,
    agent: String,
    workflow: Option<String>,
    callsite: Option<Callsite>,
}

impl<C> InstrumentedOpenAi<C> {
    /// Instrumenting an already instrumented client is a no-op; this
    /// inherent method shadows [`InstrumentOpenAi::instrument_openai`] and
    /// prevents double-counted latency or duplicate events.
    pub fn instrument_openai(self, _telemetry: &Vigil, _agent: impl Into<String>) -> Self {
        self
    }

    /// Fixed workflow name for all events from this client, overriding
    /// callsite-derived naming.
    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    /// Attribution tag for events from this client, typically `callsite!()`
    /// at the place the client is constructed.
    pub fn with_callsite(mut self, callsite: Callsite) -> Self {
        self.callsite = Some(callsite);
        self
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn finish<R: ChatCompletionsResponse, E: std::error::Error>(
        &self,
        model: String,
        started: Instant,
        result: &Result<R, E>,
    ) {
        let workflow = resolve_workflow(
            self.workflow.as_deref(),
            self.telemetry.configured_workflow(),
            self.callsite.as_ref(),
        );

        let mut builder = Event::builder(self.agent.clone())
            .workflow(workflow)
            .model(model)
            .provider("openai")
            .latency(started.elapsed());

        if let Some(callsite) = self.callsite.clone() {
            builder = builder.callsite(callsite);
        }

        match result {
            Ok(response) => {
                builder = builder.usage(
                    response.prompt_tokens().unwrap_or(0),
                    response.completion_tokens().unwrap_or(0),
                );

                if let Some(id) = response.response_id() {
                    builder = builder.request_id(id);
                }
            }
            Err(error) => {
                builder = builder.error(error_type_name::<E>(), error.to_string());
            }
        }

        self.telemetry.submit(builder.build());
    }
}

#[async_trait]
impl<C> ChatCompletions for InstrumentedOpenAi<C>
where
    C: ChatCompletions,
{
    type Request = C::Request;
    type Response = C::Response;
    type Error = C::Error;

    async fn create_chat_completion(&self, request: Self::Request) -> Result<Self::Response, Self::Error> {
        let model = request.model().unwrap_or("unknown").to_string();
        let started = Instant::now();

        // Suspends exactly where the wrapped client suspends; the timer
        // covers the full span until resumption.
        let result = self.inner.create_chat_completion(request).await;

        self.finish(model, started, &result);
        result
    }
}

impl<C> ChatCompletionsBlocking for InstrumentedOpenAi<C>
where
    C: ChatCompletionsBlocking,
{
    type Request = C::Request;
    type Response = C::Response;
    type Error = C::Error;

    fn create_chat_completion(&self, request: Self::Request) -> Result<Self::Response, Self::Error> {
        let model = request.model().unwrap_or("unknown").to_string();
        let started = Instant::now();

        let result = self.inner.create_chat_completion(request);

        self.finish(model, started, &result);
        result
    }
}
