//! Mock vendor clients implementing the adapter call traits, with canned
//! outcomes and a delegation counter.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use instrument::{
    RequestModel,
    anthropic::{Messages, MessagesResponse},
    google::{GenerateContent, GenerateContentResponse},
    openai::{ChatCompletions, ChatCompletionsBlocking, ChatCompletionsResponse},
};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockProviderError(pub &'static str);

#[derive(Clone)]
pub enum Outcome {
    Success {
        input_tokens: u64,
        output_tokens: u64,
        response_id: Option<&'static str>,
    },
    Failure(&'static str),
}

impl Outcome {
    pub fn success(input_tokens: u64, output_tokens: u64) -> Self {
        Self::Success {
            input_tokens,
            output_tokens,
            response_id: None,
        }
    }
}

/// Request type shared by the OpenAI and Anthropic mocks.
pub struct ChatRequest {
    pub model: Option<&'static str>,
}

impl RequestModel for ChatRequest {
    fn model(&self) -> Option<&str> {
        self.model
    }
}

#[derive(Debug)]
pub struct ChatResponse {
    input_tokens: u64,
    output_tokens: u64,
    response_id: Option<&'static str>,
}

impl ChatCompletionsResponse for ChatResponse {
    fn prompt_tokens(&self) -> Option<u64> {
        Some(self.input_tokens)
    }

    fn completion_tokens(&self) -> Option<u64> {
        Some(self.output_tokens)
    }

    fn response_id(&self) -> Option<&str> {
        self.response_id
    }
}

impl MessagesResponse for ChatResponse {
    fn input_tokens(&self) -> Option<u64> {
        Some(self.input_tokens)
    }

    fn output_tokens(&self) -> Option<u64> {
        Some(self.output_tokens)
    }
}

impl GenerateContentResponse for ChatResponse {
    fn prompt_token_count(&self) -> Option<u64> {
        Some(self.input_tokens)
    }

    fn candidates_token_count(&self) -> Option<u64> {
        Some(self.output_tokens)
    }
}

/// One mock for all three vendors; the adapter trait in play decides which
/// vendor it impersonates.
pub struct MockClient {
    outcome: Outcome,
    /// Name of the model bound to the instance, used by the Gemini trait only.
    pub model: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl MockClient {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            model: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: &'static str) -> Self {
        self.model = Some(model);
        self
    }

    fn respond(&self) -> Result<ChatResponse, MockProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            Outcome::Success {
                input_tokens,
                output_tokens,
                response_id,
            } => Ok(ChatResponse {
                input_tokens: *input_tokens,
                output_tokens: *output_tokens,
                response_id: *response_id,
            }),
            Outcome::Failure(message) => Err(MockProviderError(message)),
        }
    }
}

#[async_trait]
impl ChatCompletions for MockClient {
    type Request = ChatRequest;
    type Response = ChatResponse;
    type Error = MockProviderError;

    async fn create_chat_completion(&self, _request: ChatRequest) -> Result<ChatResponse, MockProviderError> {
        self.respond()
    }
}

impl ChatCompletionsBlocking for MockClient {
    type Request = ChatRequest;
    type Response = ChatResponse;
    type Error = MockProviderError;

    fn create_chat_completion(&self, _request: ChatRequest) -> Result<ChatResponse, MockProviderError> {
        self.respond()
    }
}

#[async_trait]
impl Messages for MockClient {
    type Request = ChatRequest;
    type Response = ChatResponse;
    type Error = MockProviderError;

    async fn create_message(&self, _request: ChatRequest) -> Result<ChatResponse, MockProviderError> {
        self.respond()
    }
}

#[async_trait]
impl GenerateContent for MockClient {
    type Request = ChatRequest;
    type Response = ChatResponse;
    type Error = MockProviderError;

    fn model_name(&self) -> Option<&str> {
        self.model
    }

    async fn generate_content(&self, _request: ChatRequest) -> Result<ChatResponse, MockProviderError> {
        self.respond()
    }
}
