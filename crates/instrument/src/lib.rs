//! Instrumentation entry points: the [`Vigil`] client handle, the scoped
//! tracking API and the per-provider adapter wrappers.
//!
//! Wrapping is always by composition: an adapter takes ownership of the
//! client, implements the same vendor trait, and forwards to it. No global
//! state is ever touched, and re-instrumenting an already instrumented
//! client is a no-op.

pub mod anthropic;
pub mod google;
pub mod openai;

mod tracker;

use std::{sync::Arc, time::Duration};

use config::TelemetryConfig;
use dispatch::{DispatchError, Dispatcher};
use event::Event;

pub use event::{Callsite, EventBuilder, MetadataValue, Status, callsite};
pub use tracker::TrackedOperation;

/// Request contract shared by the adapters that read the model name from the
/// request (OpenAI-compatible and Anthropic clients).
pub trait RequestModel {
    fn model(&self) -> Option<&str>;
}

/// The telemetry client.
///
/// An explicit handle rather than a process-wide singleton: construct it
/// once, clone it wherever instrumentation happens, and keep one clone alive
/// for the lifetime of the application so the exit-time drain can run.
#[derive(Clone)]
pub struct Vigil {
    inner: Arc<Inner>,
}

struct Inner {
    config: TelemetryConfig,
    dispatcher: Dispatcher,
}

impl Vigil {
    pub fn new(config: TelemetryConfig) -> Result<Self, DispatchError> {
        let dispatcher = Dispatcher::new(&config)?;

        Ok(Self {
            inner: Arc::new(Inner { config, dispatcher }),
        })
    }

    /// Shorthand for `Vigil::new(TelemetryConfig::from_env())`.
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::new(TelemetryConfig::from_env())
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.inner.config
    }

    /// Queues a pre-built event for background delivery. Non-blocking,
    /// infallible towards the caller.
    pub fn submit(&self, event: Event) {
        self.inner.dispatcher.submit(event);
    }

    /// Blocks until all queued events finished their delivery attempt or the
    /// timeout elapses; returns whether the backlog drained. Mandatory before
    /// the handler returns on serverless platforms.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.inner.dispatcher.flush(timeout)
    }

    /// Starts a manually tracked operation. The callsite is captured
    /// automatically from the caller's location; the event is built from the
    /// tracker's final state and submitted when the tracker goes out of
    /// scope.
    #[track_caller]
    pub fn track(&self, agent: impl Into<String>) -> TrackedOperation {
        self.track_at(agent, Callsite::caller())
    }

    /// Like [`track`](Self::track), with an explicitly supplied callsite,
    /// typically `callsite!()`, which also knows the enclosing function name.
    pub fn track_at(&self, agent: impl Into<String>, callsite: Callsite) -> TrackedOperation {
        TrackedOperation::new(self.clone(), agent.into(), callsite)
    }

    pub(crate) fn configured_workflow(&self) -> Option<&str> {
        self.inner.config.workflow.as_deref()
    }
}

/// Short classification of an error type, e.g.
/// `reqwest::Error` becomes `Error`, `billing::ChargeError` becomes
/// `ChargeError`.
pub(crate) fn error_type_name<E: ?Sized>() -> &'static str {
    let name = std::any::type_name::<E>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}
