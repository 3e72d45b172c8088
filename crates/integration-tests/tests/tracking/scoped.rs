use instrument::callsite;
use integration_tests::{TestCollector, clients::MockProviderError, flush};

#[tokio::test(flavor = "multi_thread")]
async fn manual_tracking_reports_on_drop() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    {
        let mut operation = telemetry.track("research-agent");
        operation.set_workflow("papers");
        operation.set_model("claude-sonnet-4-20250514");
        operation.set_provider("anthropic");
        operation.set_usage(1000, 2000);
        operation.set_retry(2);
        operation.set_metadata("customer", "acme");
        operation.set_metadata("batch", 7i64);
    }

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["agent"], "research-agent");
    assert_eq!(event["workflow"], "papers");
    assert_eq!(event["model"], "claude-sonnet-4-20250514");
    assert_eq!(event["provider"], "anthropic");
    assert_eq!(event["input_tokens"], 1000);
    assert_eq!(event["output_tokens"], 2000);
    assert_eq!(event["retry_count"], 2);
    assert_eq!(event["status"], "success");
    assert_eq!(event["metadata"]["customer"], "acme");
    assert_eq!(event["metadata"]["batch"], 7);

    // track() captures file and line automatically; the function name is not
    // recoverable without the callsite macro.
    assert!(event["file"].as_str().unwrap().ends_with("scoped.rs"));
    assert!(event["line_number"].as_u64().unwrap() > 0);
    assert_eq!(event["function_name"], "unknown");
    assert_eq!(event["callsite_hash"].as_str().unwrap().len(), 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn scoped_error_is_recorded_and_handed_back() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let result: Result<(), MockProviderError> = telemetry.track("research-agent").in_scope(|operation| {
        operation.set_model("gpt-4o");
        Err(MockProviderError("boom"))
    });

    assert_eq!(result.unwrap_err().to_string(), "boom");

    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["status"], "error");
    assert_eq!(event["error_type"], "MockProviderError");
    assert_eq!(event["metadata"]["error_message"], "boom");
}

#[tokio::test(flavor = "multi_thread")]
async fn scoped_success_returns_the_value() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let result: Result<u32, MockProviderError> = telemetry.track("research-agent").in_scope(|operation| {
        operation.set_usage(10, 20);
        Ok(42)
    });

    assert_eq!(result.unwrap(), 42);

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["status"], "success");
    assert_eq!(events[0]["input_tokens"], 10);
}

#[tokio::test(flavor = "multi_thread")]
async fn workflow_derives_from_the_callsite_file() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    let callsite = callsite!();
    drop(telemetry.track_at("research-agent", callsite));

    let events = collector.wait_for_events(1).await;

    let expected = std::path::Path::new(file!())
        .file_stem()
        .unwrap()
        .to_str()
        .unwrap();

    assert_eq!(events[0]["workflow"], expected);
    assert_eq!(events[0]["function_name"], "workflow_derives_from_the_callsite_file");
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_workflow_wins_over_derivation() {
    let collector = TestCollector::start().await;

    let config = {
        let mut config = collector.config();
        config.workflow = Some("configured".to_string());
        config
    };

    let telemetry = instrument::Vigil::new(config).unwrap();
    drop(telemetry.track("research-agent"));

    let events = collector.wait_for_events(1).await;
    assert_eq!(events[0]["workflow"], "configured");
}

#[tokio::test(flavor = "multi_thread")]
async fn handle_stays_usable_after_flush() {
    let collector = TestCollector::start().await;
    let telemetry = collector.telemetry();

    drop(telemetry.track("first"));
    assert!(flush(&telemetry).await);

    drop(telemetry.track("second"));
    assert!(flush(&telemetry).await);

    let events = collector.wait_for_events(2).await;
    assert_eq!(events.len(), 2);
}
