/// Environment variables set by the serverless platforms we recognize.
const SERVERLESS_MARKERS: &[&str] = &[
    // AWS Lambda
    "AWS_LAMBDA_FUNCTION_NAME",
    // Azure Functions
    "FUNCTIONS_WORKER_RUNTIME",
    // Google Cloud Run / Cloud Functions
    "K_SERVICE",
    "VERCEL",
    "NETLIFY",
];

/// Whether the process runs in a serverless execution environment.
///
/// Such platforms may freeze or recycle the process right after a handler
/// returns, so the dispatcher skips its automatic exit-time drain there and
/// callers are expected to flush before the function boundary closes.
pub fn is_serverless() -> bool {
    SERVERLESS_MARKERS
        .iter()
        .any(|marker| std::env::var_os(marker).is_some_and(|value| !value.is_empty()))
}
