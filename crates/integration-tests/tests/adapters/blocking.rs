use instrument::openai::{ChatCompletionsBlocking, InstrumentOpenAi};
use integration_tests::{
    TestCollector,
    clients::{ChatRequest, MockClient, Outcome},
    flush,
};

#[tokio::test(flavor = "multi_thread")]
async fn blocking_call_path_reports_usage() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(30, 60)).instrument_openai(&telemetry, "sync-agent");

    client
        .create_chat_completion(ChatRequest {
            model: Some("gpt-4o-mini"),
        })
        .unwrap();

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["provider"], "openai");
    assert_eq!(event["model"], "gpt-4o-mini");
    assert_eq!(event["input_tokens"], 30);
    assert_eq!(event["output_tokens"], 60);
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_failure_propagates_after_reporting() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::Failure("bad gateway")).instrument_openai(&telemetry, "sync-agent");

    let error = client
        .create_chat_completion(ChatRequest { model: Some("gpt-4o") })
        .unwrap_err();

    assert_eq!(error.to_string(), "bad gateway");

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["status"], "error");
}
