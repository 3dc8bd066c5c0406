//! # Resolute
//!
//! > *Try again, but on purpose.*
//!
//! Small composable primitives for fallible async code:
//!
//! - [`Outcome`]: a success/failure value with the usual combinators
//! - [`backoff`]: exponential delays with proportional jitter
//! - [`retry`]: two retry engines, one for `Result`-returning operations
//!   (the error comes back as `Err`) and one for `Outcome`-returning
//!   operations (the error comes back as a value)
//! - [`logging`]: a pluggable logger for observing retries
//!
//! ## Quick Example
//!
//! ```rust
//! use resolute::{retry_result, ErrorInfo, ErrorKind, Outcome, RetryOptions};
//! use resolute::backoff::NoBackoff;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! # tokio_test::block_on(async {
//! let calls = AtomicU32::new(0);
//!
//! let outcome = retry_result(
//!     || async {
//!         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
//!             Outcome::failure(ErrorInfo::from_kind(ErrorKind::Network, "connection reset"))
//!         } else {
//!             Outcome::success("payload")
//!         }
//!     },
//!     RetryOptions::new(3).with_backoff(NoBackoff),
//! )
//! .await;
//!
//! assert_eq!(outcome, Outcome::Success("payload"));
//! assert_eq!(calls.load(Ordering::SeqCst), 2);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod retry;
pub mod testing;

// Re-exports
pub use backoff::{
    create_backoff, exponential_backoff, exponential_backoff_with_jitter, Backoff,
    BackoffOptions, ExponentialBackoff,
};
pub use error::{ErrorInfo, ErrorKind, Recoverable, TimeoutError, UnwrapError};
pub use outcome::{all, try_async, try_sync, Outcome};
pub use retry::{retry, retry_async, retry_result, RetryOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{
        create_backoff, exponential_backoff, exponential_backoff_with_jitter, Backoff,
        BackoffOptions, NoBackoff,
    };
    pub use crate::error::{ErrorInfo, ErrorKind, Recoverable, TimeoutError};
    pub use crate::logging::{log_retries, LogLevel, LogSink, Logger};
    pub use crate::outcome::{all, try_async, try_sync, Outcome};
    pub use crate::retry::{retry, retry_async, retry_result, with_timeout, RetryOptions};
}
