//! Backoff delays between retry attempts.
//!
//! A [`Backoff`] answers one question: how long to wait after failed attempt
//! `n` before trying attempt `n + 1`. The retry engines call
//! [`Backoff::wait`] between attempts and never after the final one.
//!
//! # Quick Start
//!
//! ```rust
//! use resolute::backoff::{exponential_backoff, Backoff};
//! use std::time::Duration;
//!
//! // Deterministic: 100ms, 200ms, 400ms, ... capped at 8s
//! let backoff = exponential_backoff(Some(Duration::from_millis(100)));
//! assert_eq!(backoff.delay(3), Duration::from_millis(400));
//! ```
//!
//! # Constructors
//!
//! - [`exponential_backoff_with_jitter`]: exponential growth with ±jitter
//! - [`exponential_backoff`]: the same growth with jitter disabled
//! - [`create_backoff`]: another name for [`exponential_backoff_with_jitter`]
//!
//! Any `Fn(u32) -> Duration` is also a [`Backoff`], and [`NoBackoff`] skips
//! waiting entirely.

mod exponential;
mod jitter;
mod options;

pub use exponential::ExponentialBackoff;
pub use jitter::{FixedJitter, JitterSource};
#[cfg(feature = "jitter")]
pub use jitter::{SeededJitter, ThreadRngJitter};
pub use options::{
    BackoffOptions, DEFAULT_BASE_DELAY, DEFAULT_JITTER_FACTOR, DEFAULT_MAX_DELAY,
};

use std::time::Duration;

use futures::future::BoxFuture;

/// Computes and performs the wait between attempts.
///
/// Implementors only need [`delay`](Backoff::delay); the provided
/// [`wait`](Backoff::wait) sleeps on the tokio timer for that long and skips
/// the timer entirely for a zero delay.
pub trait Backoff: Send + Sync {
    /// The delay after failed attempt `attempt` (1-indexed).
    fn delay(&self, attempt: u32) -> Duration;

    /// Suspend the caller for [`delay(attempt)`](Backoff::delay).
    fn wait(&self, attempt: u32) -> BoxFuture<'_, ()> {
        let delay = self.delay(attempt);
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        })
    }
}

impl<F> Backoff for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

/// Retries immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoBackoff;

impl Backoff for NoBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Exponential backoff with proportional jitter.
///
/// Unset options fall back to a 200ms base, an 8s cap and ±20% jitter.
///
/// ```rust
/// use resolute::backoff::{exponential_backoff_with_jitter, Backoff, BackoffOptions};
/// use std::time::Duration;
///
/// let backoff = exponential_backoff_with_jitter(BackoffOptions::new());
/// let d = backoff.delay(1);
/// assert!(d >= Duration::from_millis(160) && d <= Duration::from_millis(240));
/// ```
pub fn exponential_backoff_with_jitter(options: BackoffOptions) -> ExponentialBackoff {
    ExponentialBackoff::from_options(options)
}

/// Exponential backoff with jitter forced off.
///
/// `None` uses the default 200ms base. The cap is the default 8s.
pub fn exponential_backoff(base: Option<Duration>) -> ExponentialBackoff {
    let options = BackoffOptions {
        base_delay: base,
        max_delay: None,
        jitter_factor: Some(0.0),
    };
    ExponentialBackoff::from_options(options)
}

/// Same algorithm as [`exponential_backoff_with_jitter`], named for call sites
/// that build a backoff from configuration.
pub fn create_backoff(options: BackoffOptions) -> ExponentialBackoff {
    exponential_backoff_with_jitter(options)
}
