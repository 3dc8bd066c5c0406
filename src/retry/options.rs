//! Retry session configuration and its normalization.

use std::fmt;
use std::sync::Arc;

use crate::backoff::{exponential_backoff_with_jitter, Backoff, BackoffOptions};

/// Continuation predicate: `(error, attempt) -> keep going?`.
pub type RetryCondition<E> = Arc<dyn Fn(&E, u32) -> bool + Send + Sync>;

/// Observer called before each retry with `(attempt, error)`.
pub type OnRetry<E> = Arc<dyn Fn(u32, &E) + Send + Sync>;

/// Configuration for one retry session.
///
/// `max_retries` is the number of attempts allowed *after* the first one, so a
/// session makes at most `max_retries + 1` attempts. It has no default: every
/// call site states its budget.
///
/// Options are immutable once built and cheap to clone; the same options can
/// drive many independent sessions.
///
/// # Examples
///
/// ```rust
/// use resolute::RetryOptions;
/// use resolute::backoff::NoBackoff;
///
/// let options = RetryOptions::<std::io::Error>::new(3)
///     .with_backoff(NoBackoff)
///     .with_retry_condition(|err, _attempt| err.kind() == std::io::ErrorKind::Interrupted)
///     .with_on_retry(|attempt, err| eprintln!("attempt {attempt} failed: {err}"));
///
/// assert_eq!(options.max_retries(), 3);
/// ```
pub struct RetryOptions<E> {
    max_retries: u32,
    backoff: Option<Arc<dyn Backoff>>,
    retry_condition: Option<RetryCondition<E>>,
    on_retry: Option<OnRetry<E>>,
}

impl<E> RetryOptions<E> {
    /// Options allowing `max_retries` retries after the first attempt.
    ///
    /// Attempts are numbered with a `u32`, so a session never runs more than
    /// `u32::MAX` attempts. With `max_retries = u32::MAX` it stops after
    /// attempt `u32::MAX`, one short of `max_retries + 1`.
    pub fn new(max_retries: u32) -> Self {
        RetryOptions {
            max_retries,
            backoff: None,
            retry_condition: None,
            on_retry: None,
        }
    }

    /// Wait between attempts using `backoff`.
    ///
    /// Defaults to [`exponential_backoff_with_jitter`] with library defaults.
    pub fn with_backoff<B>(mut self, backoff: B) -> Self
    where
        B: Backoff + 'static,
    {
        self.backoff = Some(Arc::new(backoff));
        self
    }

    /// Share an existing backoff between several option sets.
    pub fn with_shared_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Shorthand for `with_backoff(exponential_backoff_with_jitter(options))`.
    pub fn with_backoff_options(self, options: BackoffOptions) -> Self {
        self.with_backoff(exponential_backoff_with_jitter(options))
    }

    /// Decide per failure whether another attempt is worthwhile.
    ///
    /// Replaces the engine's default predicate entirely; it is not combined
    /// with it. The predicate is not consulted once the budget is spent.
    pub fn with_retry_condition<P>(mut self, condition: P) -> Self
    where
        P: Fn(&E, u32) -> bool + Send + Sync + 'static,
    {
        self.retry_condition = Some(Arc::new(condition));
        self
    }

    /// Observe each failure that is about to be retried.
    ///
    /// Not called for the final failure that ends the session.
    pub fn with_on_retry<H>(mut self, on_retry: H) -> Self
    where
        H: Fn(u32, &E) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(on_retry));
        self
    }

    /// The retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fill in the defaults an engine needs to run.
    ///
    /// `fallback` is used only when no retry condition was supplied.
    pub(crate) fn normalize(self, fallback: fn(&E, u32) -> bool) -> Session<E> {
        Session {
            max_retries: self.max_retries,
            backoff: self
                .backoff
                .unwrap_or_else(|| Arc::new(exponential_backoff_with_jitter(BackoffOptions::new()))),
            retry_condition: self.retry_condition,
            fallback,
            on_retry: self.on_retry,
        }
    }
}

impl<E> Clone for RetryOptions<E> {
    fn clone(&self) -> Self {
        RetryOptions {
            max_retries: self.max_retries,
            backoff: self.backoff.clone(),
            retry_condition: self.retry_condition.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff.as_ref().map(|_| "<backoff>"))
            .field("retry_condition", &self.retry_condition.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

/// Fully-resolved options for a single running session.
pub(crate) struct Session<E> {
    max_retries: u32,
    backoff: Arc<dyn Backoff>,
    retry_condition: Option<RetryCondition<E>>,
    fallback: fn(&E, u32) -> bool,
    on_retry: Option<OnRetry<E>>,
}

impl<E> Session<E> {
    /// Whether failed attempt `attempt` should be followed by another.
    pub(crate) fn should_retry(&self, error: &E, attempt: u32) -> bool {
        // u32::MAX is the last attempt that can be numbered.
        if attempt > self.max_retries || attempt == u32::MAX {
            return false;
        }
        match &self.retry_condition {
            Some(condition) => condition(error, attempt),
            None => (self.fallback)(error, attempt),
        }
    }

    pub(crate) fn notify(&self, attempt: u32, error: &E) {
        if let Some(on_retry) = &self.on_retry {
            on_retry(attempt, error);
        }
    }

    pub(crate) async fn wait(&self, attempt: u32) {
        self.backoff.wait(attempt).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::NoBackoff;

    fn never(_: &&str, _: u32) -> bool {
        false
    }

    fn always(_: &&str, _: u32) -> bool {
        true
    }

    #[test]
    fn test_budget_cuts_off_before_predicate() {
        let session = RetryOptions::<&str>::new(2).normalize(always);
        assert!(session.should_retry(&"e", 1));
        assert!(session.should_retry(&"e", 2));
        assert!(!session.should_retry(&"e", 3));
    }

    #[test]
    fn test_zero_budget_never_retries() {
        let session = RetryOptions::<&str>::new(0).normalize(always);
        assert!(!session.should_retry(&"e", 1));
    }

    #[test]
    fn test_custom_condition_replaces_fallback() {
        let session = RetryOptions::<&str>::new(5)
            .with_retry_condition(|err, _| *err == "transient")
            .normalize(never);

        assert!(session.should_retry(&"transient", 1));
        assert!(!session.should_retry(&"fatal", 1));
    }

    #[test]
    fn test_condition_sees_attempt_number() {
        let session = RetryOptions::<&str>::new(10)
            .with_retry_condition(|_, attempt| attempt < 3)
            .normalize(always);

        assert!(session.should_retry(&"e", 2));
        assert!(!session.should_retry(&"e", 3));
    }

    #[test]
    fn test_unbounded_budget_stops_at_last_numbered_attempt() {
        let session = RetryOptions::<&str>::new(u32::MAX).normalize(always);
        assert!(session.should_retry(&"e", u32::MAX - 1));
        assert!(!session.should_retry(&"e", u32::MAX));
    }

    #[test]
    fn test_clone_shares_callbacks() {
        let options = RetryOptions::<&str>::new(1)
            .with_backoff(NoBackoff)
            .with_on_retry(|_, _| {});
        let cloned = options.clone();
        assert_eq!(cloned.max_retries(), 1);
        assert!(format!("{:?}", cloned).contains("on_retry: true"));
    }
}
