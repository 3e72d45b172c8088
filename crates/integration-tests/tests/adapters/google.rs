use instrument::google::{GenerateContent, InstrumentGoogle};
use integration_tests::{
    TestCollector,
    clients::{ChatRequest, MockClient, Outcome},
    flush,
};

#[tokio::test(flavor = "multi_thread")]
async fn model_comes_from_the_instance() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(200, 800))
        .with_model("gemini-1.5-pro")
        .instrument_google(&telemetry, "summarizer");

    client.generate_content(ChatRequest { model: None }).await.unwrap();

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["provider"], "google");
    assert_eq!(event["model"], "gemini-1.5-pro");
    assert_eq!(event["input_tokens"], 200);
    assert_eq!(event["output_tokens"], 800);
}

#[tokio::test(flavor = "multi_thread")]
async fn unnamed_instance_gets_a_placeholder_model() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::success(1, 1)).instrument_google(&telemetry, "summarizer");

    client.generate_content(ChatRequest { model: None }).await.unwrap();

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["model"], "gemini-unknown");
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_reports_and_propagates() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let client = MockClient::new(Outcome::Failure("quota exceeded"))
        .with_model("gemini-1.5-flash")
        .instrument_google(&telemetry, "summarizer");

    let error = client.generate_content(ChatRequest { model: None }).await.unwrap_err();
    assert_eq!(error.to_string(), "quota exceeded");

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["status"], "error");
    assert_eq!(events[0]["model"], "gemini-1.5-flash");
}
