//! Retry Tracing Example
//!
//! Wires the retry engines into `tracing` through the logging module.
//!
//! Run with: cargo run --example retry_tracing --features tracing

use resolute::backoff::{exponential_backoff_with_jitter, BackoffOptions};
use resolute::logging::{log_retries, Logger};
use resolute::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let logger = Logger::tracing().with_context("service", "inventory");
    let backoff = exponential_backoff_with_jitter(
        BackoffOptions::new()
            .with_base_delay(Duration::from_millis(50))
            .with_max_delay(Duration::from_millis(400)),
    );

    // Exception-style: the operation fails with Err.
    let calls = AtomicU32::new(0);
    let stock = retry_async(
        || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err("connection reset".to_string())
            } else {
                Ok(17u32)
            }
        },
        RetryOptions::new(4)
            .with_backoff(backoff.clone())
            .with_on_retry(log_retries(logger.clone(), "GET /stock/42")),
    )
    .await;
    logger.info(format_args!("stock lookup finished: {:?}", stock));

    // Outcome-style: permanent errors come back on the first attempt.
    let outcome: Outcome<u32, ErrorInfo> = retry_result(
        || async {
            Outcome::failure(ErrorInfo::from_kind(ErrorKind::NotFound, "sku 42 does not exist"))
        },
        RetryOptions::new(4)
            .with_backoff(backoff)
            .with_on_retry(log_retries(logger.clone(), "GET /sku/42")),
    )
    .await;
    if let Outcome::Failure(err) = &outcome {
        logger.warn(format_args!("giving up: {} ({})", err, err.kind()));
    }

    // Bounding a whole session in wall-clock time.
    let bounded = with_timeout(
        retry_async(
            || async { Err::<(), _>("still down") },
            RetryOptions::new(20).with_backoff(exponential_backoff(Some(Duration::from_millis(100)))),
        ),
        Duration::from_millis(500),
    )
    .await;
    logger.error(format_args!("bounded session: {:?}", bounded));
}
