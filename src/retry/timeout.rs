//! Wall-clock bounds for retry sessions.

use std::future::Future;
use std::time::Duration;

use crate::error::TimeoutError;

/// Race a fallible future against a deadline.
///
/// The engines have no deadline of their own; wrap a whole session in
/// `with_timeout` to bound its total time. On timeout the session is dropped
/// at its current suspension point, so no further attempt starts.
///
/// ```rust
/// use resolute::retry::with_timeout;
/// use resolute::{retry_async, RetryOptions, TimeoutError};
/// use resolute::backoff::exponential_backoff;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let session = retry_async(
///     || async { Err::<(), _>("down") },
///     RetryOptions::new(100).with_backoff(exponential_backoff(Some(Duration::from_millis(20)))),
/// );
///
/// let result = with_timeout(session, Duration::from_millis(50)).await;
/// assert!(matches!(result, Err(TimeoutError::Timeout { .. })));
/// # });
/// ```
pub async fn with_timeout<T, E, Fut>(future: Fut, duration: Duration) -> Result<T, TimeoutError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(TimeoutError::Inner(error)),
        Err(_) => Err(TimeoutError::Timeout { duration }),
    }
}
