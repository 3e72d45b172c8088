use instrument::anthropic::{InstrumentAnthropic, Messages};
use integration_tests::{
    TestCollector,
    clients::{ChatRequest, MockClient, Outcome},
    flush,
};

#[tokio::test(flavor = "multi_thread")]
async fn success_reports_usage_and_provider() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(1000, 2500)).instrument_anthropic(&telemetry, "research-agent");

    client
        .create_message(ChatRequest {
            model: Some("claude-sonnet-4-20250514"),
        })
        .await
        .unwrap();

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["agent"], "research-agent");
    assert_eq!(event["provider"], "anthropic");
    assert_eq!(event["model"], "claude-sonnet-4-20250514");
    assert_eq!(event["input_tokens"], 1000);
    assert_eq!(event["output_tokens"], 2500);
    assert_eq!(event["status"], "success");

    // No provider override here, so the id stays the locally generated UUID.
    assert_eq!(event["request_id"].as_str().unwrap().len(), 36);
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_reports_and_propagates() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::Failure("overloaded")).instrument_anthropic(&telemetry, "research-agent");

    let error = client
        .create_message(ChatRequest {
            model: Some("claude-sonnet-4-20250514"),
        })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "overloaded");

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], "error");
    assert_eq!(events[0]["error_type"], "MockProviderError");
}
