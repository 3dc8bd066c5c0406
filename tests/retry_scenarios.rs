//! End-to-end retry scenarios, written the way consumer code uses the engines.

use resolute::backoff::NoBackoff;
use resolute::logging::{log_retries, LogLevel, Logger, MemorySink};
use resolute::prelude::*;
use resolute::{assert_failure, assert_success};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct OpError(&'static str);

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A fake endpoint that answers from a script, one entry per call.
#[derive(Clone)]
struct ScriptedEndpoint {
    calls: Arc<AtomicU32>,
    script: Arc<Vec<Outcome<&'static str, ErrorInfo>>>,
}

impl ScriptedEndpoint {
    fn new(script: Vec<Outcome<&'static str, ErrorInfo>>) -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
            script: Arc::new(script),
        }
    }

    async fn call(&self) -> Outcome<&'static str, ErrorInfo> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let last = self.script.len() - 1;
        self.script[n.min(last)].clone()
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn scenario_throws_twice_then_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let retries: Arc<Mutex<Vec<(u32, OpError)>>> = Arc::new(Mutex::new(Vec::new()));

    let result = retry_async(
        {
            let calls = calls.clone();
            move || {
                let calls = calls.clone();
                async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 => Err(OpError("x1")),
                        1 => Err(OpError("x2")),
                        _ => Ok("ok"),
                    }
                }
            }
        },
        RetryOptions::new(5)
            .with_backoff(|_attempt: u32| std::time::Duration::ZERO)
            .with_on_retry({
                let retries = retries.clone();
                move |attempt, err: &OpError| retries.lock().unwrap().push((attempt, err.clone()))
            }),
    )
    .await;

    assert_eq!(result, Ok("ok"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        *retries.lock().unwrap(),
        vec![(1, OpError("x1")), (2, OpError("x2"))]
    );
}

#[tokio::test]
async fn scenario_always_throwing_runs_budget_plus_one() {
    for max_retries in [0u32, 1, 4, 9] {
        let calls = Arc::new(AtomicU32::new(0));
        let hooks = Arc::new(AtomicU32::new(0));

        let result: Result<(), OpError> = retry(
            {
                let calls = calls.clone();
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(OpError("down"))
                }
            },
            RetryOptions::new(max_retries)
                .with_backoff(NoBackoff)
                .with_on_retry({
                    let hooks = hooks.clone();
                    move |_, _| {
                        hooks.fetch_add(1, Ordering::SeqCst);
                    }
                }),
        )
        .await;

        assert_eq!(result, Err(OpError("down")));
        assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
        assert_eq!(hooks.load(Ordering::SeqCst), max_retries);
    }
}

#[tokio::test]
async fn scenario_rate_limited_then_ok() {
    let endpoint = ScriptedEndpoint::new(vec![
        Outcome::failure(ErrorInfo::from_kind(ErrorKind::RateLimited, "429 Too Many Requests")),
        Outcome::failure(ErrorInfo::from_kind(ErrorKind::Network, "connection reset")),
        Outcome::success("{\"status\":\"ok\"}"),
    ]);

    let outcome = retry_result(
        {
            let endpoint = endpoint.clone();
            move || {
                let endpoint = endpoint.clone();
                async move { endpoint.call().await }
            }
        },
        RetryOptions::new(3).with_backoff(NoBackoff),
    )
    .await;

    assert_success!(outcome.clone());
    assert_eq!(outcome.unwrap_or(""), "{\"status\":\"ok\"}");
    assert_eq!(endpoint.calls(), 3);
}

#[tokio::test]
async fn scenario_unauthorized_is_not_retried() {
    let endpoint = ScriptedEndpoint::new(vec![Outcome::failure(ErrorInfo::from_kind(
        ErrorKind::Unauthorized,
        "401 Unauthorized",
    ))]);

    let outcome = retry_result(
        {
            let endpoint = endpoint.clone();
            move || {
                let endpoint = endpoint.clone();
                async move { endpoint.call().await }
            }
        },
        RetryOptions::new(5).with_backoff(NoBackoff),
    )
    .await;

    assert_failure!(outcome.clone());
    assert_eq!(outcome.err().map(|e| e.kind()), Some(ErrorKind::Unauthorized));
    assert_eq!(endpoint.calls(), 1);
}

#[tokio::test]
async fn scenario_exhausted_result_reenters_error_flow() {
    let endpoint = ScriptedEndpoint::new(vec![Outcome::failure(
        ErrorInfo::from_kind(ErrorKind::Timeout, "upstream timeout").context("loading profile"),
    )]);

    let outcome = retry_result(
        {
            let endpoint = endpoint.clone();
            move || {
                let endpoint = endpoint.clone();
                async move { endpoint.call().await }
            }
        },
        RetryOptions::new(2).with_backoff(NoBackoff),
    )
    .await;

    let err = outcome.unwrap_or_raise().unwrap_err();
    assert_eq!(err.message(), "upstream timeout\n  -> loading profile");
    assert_eq!(endpoint.calls(), 3);
}

#[tokio::test]
async fn scenario_retries_are_logged_at_debug() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone()).with_context("client", "billing");

    let result: Result<(), OpError> = retry_async(
        || async { Err(OpError("503 Service Unavailable")) },
        RetryOptions::new(2)
            .with_backoff(NoBackoff)
            .with_on_retry(log_retries(logger, "POST /invoices")),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        sink.records(),
        vec![
            (
                LogLevel::Debug,
                "[client=billing] retrying POST /invoices after attempt 1 failed: 503 Service Unavailable"
                    .to_string()
            ),
            (
                LogLevel::Debug,
                "[client=billing] retrying POST /invoices after attempt 2 failed: 503 Service Unavailable"
                    .to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn scenario_collect_many_sessions() {
    let ids = [1u32, 2, 3];
    let mut outcomes = Vec::new();

    for id in ids {
        let outcome = retry_result(
            move || async move {
                if id == 2 {
                    Outcome::failure(ErrorInfo::new(format!("item {id} missing")))
                } else {
                    Outcome::success(id * 10)
                }
            },
            RetryOptions::new(1).with_backoff(NoBackoff),
        )
        .await;
        outcomes.push(outcome);
    }

    match all(outcomes) {
        Outcome::Failure(err) => assert_eq!(err.message(), "item 2 missing"),
        Outcome::Success(values) => panic!("Expected failure, got {:?}", values),
    }
}

#[cfg(feature = "tracing")]
mod tracing_logs {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[tokio::test]
    async fn retries_reach_tracing_subscriber() {
        let _: Result<(), OpError> = retry_async(
            || async { Err(OpError("connection refused")) },
            RetryOptions::new(1)
                .with_backoff(NoBackoff)
                .with_on_retry(log_retries(Logger::tracing(), "GET /health")),
        )
        .await;

        assert!(logs_contain(
            "retrying GET /health after attempt 1 failed: connection refused"
        ));
    }
}
