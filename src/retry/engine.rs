//! The two retry engines.
//!
//! Both run the same state machine: attempt `n`, and on failure either stop
//! (budget spent or predicate says no) or notify, wait, and attempt `n + 1`.
//! They differ only in how an operation reports failure and how the engine
//! reports it back:
//!
//! | engine | operation returns | engine returns | default predicate |
//! |---|---|---|---|
//! | [`retry_async`] / [`retry`] | `Result<T, E>` | `Result<T, E>` | always retry |
//! | [`retry_result`] | `Outcome<T, E>` | `Outcome<T, E>` | [`Recoverable::is_recoverable`] |
//!
//! Neither engine wraps the operation's error: running out of retries yields
//! exactly the error of the last attempt.

use std::future::Future;

use crate::error::Recoverable;
use crate::outcome::Outcome;
use crate::retry::options::RetryOptions;

fn always_retry<E>(_error: &E, _attempt: u32) -> bool {
    true
}

fn retry_if_recoverable<E: Recoverable>(error: &E, _attempt: u32) -> bool {
    error.is_recoverable()
}

/// Retry an async operation that fails by returning `Err`.
///
/// Attempts run strictly one after another. After failed attempt `n` the
/// session ends with that error if `n > max_retries` or the retry condition
/// rejects it; otherwise `on_retry(n, &error)` runs, the backoff waits, and
/// attempt `n + 1` starts. No wait happens before the first attempt or after
/// the last.
///
/// The session future does not keep a failed attempt's error alive while it
/// waits, so it is `Send` whenever the operation and its future are,
/// even for a non-`Send` `E`.
///
/// # Example
///
/// ```rust
/// use resolute::{retry_async, RetryOptions};
/// use resolute::backoff::NoBackoff;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # tokio_test::block_on(async {
/// let calls = AtomicU32::new(0);
///
/// let result = retry_async(
///     || async {
///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err("not yet")
///         } else {
///             Ok("ready")
///         }
///     },
///     RetryOptions::new(5).with_backoff(NoBackoff),
/// )
/// .await;
///
/// assert_eq!(result, Ok("ready"));
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn retry_async<T, E, F, Fut>(mut operation: F, options: RetryOptions<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let session = options.normalize(always_retry::<E>);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            // Not held across the wait.
            Err(error) => {
                if !session.should_retry(&error, attempt) {
                    return Err(error);
                }
                session.notify(attempt, &error);
            }
        }
        session.wait(attempt).await;
        attempt += 1;
    }
}

/// Retry a synchronous operation that fails by returning `Err`.
///
/// The operation is lifted into an already-completed future and run by
/// [`retry_async`], so attempt counting, callbacks and waits are identical.
/// Waiting still needs a tokio runtime.
///
/// ```rust
/// use resolute::{retry, RetryOptions};
/// use resolute::backoff::NoBackoff;
///
/// # tokio_test::block_on(async {
/// let mut calls = 0;
/// let result: Result<(), &str> = retry(
///     || {
///         calls += 1;
///         Err("always")
///     },
///     RetryOptions::new(2).with_backoff(NoBackoff),
/// )
/// .await;
///
/// assert_eq!(result, Err("always"));
/// assert_eq!(calls, 3);
/// # });
/// ```
pub async fn retry<T, E, F>(mut operation: F, options: RetryOptions<E>) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    retry_async(move || std::future::ready(operation()), options).await
}

/// Retry an async operation that fails by returning `Outcome::Failure`.
///
/// Same attempt counting, callbacks and waits as [`retry_async`], but this
/// engine never raises: when the session ends on a failure, that last
/// `Failure` is the return value. Without a custom retry condition, only
/// failures whose error [`is_recoverable`](Recoverable::is_recoverable) are
/// retried.
///
/// ```rust
/// use resolute::{retry_result, ErrorInfo, Outcome, RetryOptions};
/// use resolute::backoff::NoBackoff;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # tokio_test::block_on(async {
/// let calls = AtomicU32::new(0);
///
/// let outcome: Outcome<(), ErrorInfo> = retry_result(
///     || async {
///         calls.fetch_add(1, Ordering::SeqCst);
///         Outcome::failure(ErrorInfo::new("invalid token").permanent())
///     },
///     RetryOptions::new(5).with_backoff(NoBackoff),
/// )
/// .await;
///
/// assert!(outcome.is_failure());
/// assert_eq!(calls.load(Ordering::SeqCst), 1); // permanent errors are not retried
/// # });
/// ```
pub async fn retry_result<T, E, F, Fut>(
    mut operation: F,
    options: RetryOptions<E>,
) -> Outcome<T, E>
where
    E: Recoverable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
{
    let session = options.normalize(retry_if_recoverable::<E>);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Outcome::Success(value) => return Outcome::Success(value),
            Outcome::Failure(error) => {
                if !session.should_retry(&error, attempt) {
                    return Outcome::Failure(error);
                }
                session.notify(attempt, &error);
            }
        }
        session.wait(attempt).await;
        attempt += 1;
    }
}
