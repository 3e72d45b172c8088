use std::sync::atomic::Ordering;

use instrument::openai::{ChatCompletions, InstrumentOpenAi};
use integration_tests::{
    TestCollector,
    clients::{ChatRequest, MockClient, Outcome},
    flush,
};

#[tokio::test(flavor = "multi_thread")]
async fn success_reports_usage_and_provider() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::Success {
        input_tokens: 150,
        output_tokens: 450,
        response_id: Some("chatcmpl-abc123"),
    })
    .instrument_openai(&telemetry, "billing-bot");

    client
        .create_chat_completion(ChatRequest { model: Some("gpt-4o") })
        .await
        .unwrap();

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["agent"], "billing-bot");
    assert_eq!(event["provider"], "openai");
    assert_eq!(event["model"], "gpt-4o");
    assert_eq!(event["input_tokens"], 150);
    assert_eq!(event["output_tokens"], 450);
    assert_eq!(event["status"], "success");
    assert_eq!(event["event_version"], "1.0");

    // The provider-assigned id replaces the locally generated one.
    assert_eq!(event["request_id"], "chatcmpl-abc123");
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_reports_exactly_one_error_event_and_propagates() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::Failure("rate limited")).instrument_openai(&telemetry, "billing-bot");

    let error = client
        .create_chat_completion(ChatRequest { model: Some("gpt-4o") })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "rate limited");

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["status"], "error");
    assert_eq!(event["error_type"], "MockProviderError");
    assert_eq!(event["metadata"]["error_message"], "rate limited");
    assert_eq!(event["input_tokens"], 0);
    assert_eq!(event["output_tokens"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn instrumenting_twice_is_a_noop() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(10, 20))
        .instrument_openai(&telemetry, "first")
        .instrument_openai(&telemetry, "second");

    client
        .create_chat_completion(ChatRequest { model: Some("gpt-4o-mini") })
        .await
        .unwrap();

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["agent"], "first");

    // One layer of wrapping, one delegated call.
    let inner = client.into_inner();
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn fixed_workflow_wins_over_derivation() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(1, 1))
        .instrument_openai(&telemetry, "billing-bot")
        .with_workflow("checkout");

    client
        .create_chat_completion(ChatRequest { model: Some("gpt-4o") })
        .await
        .unwrap();

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["workflow"], "checkout");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_model_defaults_to_unknown() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(1, 1)).instrument_openai(&telemetry, "billing-bot");

    client.create_chat_completion(ChatRequest { model: None }).await.unwrap();

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["model"], "unknown");
}
