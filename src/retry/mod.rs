//! Retry engines with pluggable backoff and continuation policy.
//!
//! A retry session drives one logical operation through at most
//! `max_retries + 1` attempts. Between attempts it consults a continuation
//! predicate, notifies an optional observer and waits on a [`Backoff`].
//!
//! [`Backoff`]: crate::backoff::Backoff
//!
//! # Quick Start
//!
//! ```rust
//! use resolute::{retry_async, RetryOptions, BackoffOptions};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let options = RetryOptions::new(3).with_backoff_options(
//!     BackoffOptions::new().with_base_delay(Duration::from_millis(1)),
//! );
//!
//! let value = retry_async(|| async { Ok::<_, String>(42) }, options).await;
//! assert_eq!(value, Ok(42));
//! # });
//! ```
//!
//! # Two engines
//!
//! - [`retry_async`] / [`retry`]: the operation fails with `Err`, and the
//!   engine hands back the last `Err` unchanged.
//! - [`retry_result`]: the operation fails with [`Outcome::Failure`], and the
//!   engine returns the last failure as a value. By default it retries only
//!   [`Recoverable`] errors.
//!
//! [`Outcome::Failure`]: crate::Outcome::Failure
//! [`Recoverable`]: crate::Recoverable
//!
//! # Cancellation
//!
//! Sessions have no built-in deadline. Wrap one in [`with_timeout`] or have
//! the operation watch its own cancellation signal.

mod engine;
mod options;
mod timeout;

pub use engine::{retry, retry_async, retry_result};
pub use options::{OnRetry, RetryCondition, RetryOptions};
pub use timeout::with_timeout;
