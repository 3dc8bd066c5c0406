//! Testing utilities for code built on `resolute`.
//!
//! # Assertion Macros
//!
//! ```rust
//! use resolute::{Outcome, assert_success, assert_failure};
//!
//! let ok = Outcome::<_, String>::success(42);
//! assert_success!(ok);
//!
//! let failed = Outcome::<i32, _>::failure("error");
//! assert_failure!(failed);
//! ```
//!
//! # Observing backoff
//!
//! [`RecordingBackoff`] never sleeps and remembers which attempts asked for a
//! wait, so tests can check retry timing without touching the clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backoff::Backoff;

/// Assert that an outcome is a success.
///
/// Panics with the error's `Debug` form if it is a `Failure`.
///
/// ```rust
/// use resolute::{Outcome, assert_success};
///
/// assert_success!(Outcome::<_, String>::success(1));
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(_) => {}
            $crate::Outcome::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that an outcome is a failure.
///
/// Panics with the value's `Debug` form if it is a `Success`.
///
/// ```rust
/// use resolute::{Outcome, assert_failure};
///
/// assert_failure!(Outcome::<i32, _>::failure("nope"));
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure(_) => {}
            $crate::Outcome::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

/// A backoff that records each requested attempt and never waits.
///
/// Clones share the same record.
///
/// ```rust
/// use resolute::testing::RecordingBackoff;
/// use resolute::{retry_async, RetryOptions};
///
/// # tokio_test::block_on(async {
/// let backoff = RecordingBackoff::new();
/// let _ = retry_async(
///     || async { Err::<(), _>("down") },
///     RetryOptions::new(2).with_backoff(backoff.clone()),
/// )
/// .await;
///
/// assert_eq!(backoff.attempts(), vec![1, 2]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingBackoff {
    attempts: Arc<Mutex<Vec<u32>>>,
}

impl RecordingBackoff {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts that requested a wait, in order.
    pub fn attempts(&self) -> Vec<u32> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Backoff for RecordingBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(attempt);
        Duration::ZERO
    }
}

#[cfg(feature = "proptest")]
use crate::Outcome;
#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<T, E> Arbitrary for Outcome<T, E>
where
    T: Arbitrary + 'static,
    E: Arbitrary + 'static,
    T::Strategy: 'static,
    E::Strategy: 'static,
{
    type Parameters = (T::Parameters, E::Parameters);
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        let (t_params, e_params) = args;
        prop_oneof![
            any_with::<T>(t_params).prop_map(Outcome::success),
            any_with::<E>(e_params).prop_map(Outcome::failure),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;

    #[test]
    fn assert_success_macro() {
        assert_success!(Outcome::<_, String>::success(42));
    }

    #[test]
    fn assert_failure_macro() {
        assert_failure!(Outcome::<i32, _>::failure("error"));
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_success_panics_on_failure() {
        assert_success!(Outcome::<i32, _>::failure("error"));
    }

    #[test]
    #[should_panic(expected = "Expected Failure, got Success")]
    fn assert_failure_panics_on_success() {
        assert_failure!(Outcome::<_, String>::success(42));
    }

    #[test]
    fn recording_backoff_shares_state() {
        let backoff = RecordingBackoff::new();
        let clone = backoff.clone();

        assert_eq!(clone.delay(1), Duration::ZERO);
        assert_eq!(clone.delay(2), Duration::ZERO);

        assert_eq!(backoff.attempts(), vec![1, 2]);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outcome_arbitrary_generates_valid_instances(
                o in any::<Outcome<i32, String>>()
            ) {
                prop_assert!(o.is_success() != o.is_failure());
            }

            #[test]
            fn outcome_arbitrary_composes_with_combinators(
                o in any::<Outcome<Vec<u8>, String>>()
            ) {
                let len = o.clone().map(|bytes| bytes.len());
                prop_assert_eq!(len.is_success(), o.is_success());
                prop_assert_eq!(len.err(), o.err());
            }
        }
    }
}
