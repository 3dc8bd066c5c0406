//! Property-based tests for backoff delays

use proptest::prelude::*;
use resolute::backoff::{exponential_backoff, Backoff, ExponentialBackoff, FixedJitter};
use std::time::Duration;

fn clipped_ms(base_ms: u64, max_ms: u64, attempt: u32) -> u64 {
    let exponential = base_ms.saturating_mul(1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX));
    exponential.min(max_ms)
}

proptest! {
    #[test]
    fn prop_unjittered_delay_is_capped_exponential(
        base_ms in 0u64..5_000,
        max_ms in 0u64..120_000,
        attempt in 1u32..40,
    ) {
        let backoff = ExponentialBackoff::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
            0.0,
        );

        prop_assert_eq!(
            backoff.delay(attempt),
            Duration::from_millis(clipped_ms(base_ms, max_ms, attempt))
        );
    }

    #[test]
    fn prop_jittered_delay_within_bounds(
        base_ms in 1u64..5_000,
        max_ms in 1u64..120_000,
        attempt in 1u32..20,
        factor in 0.0f64..=1.0,
        sample in -1.0f64..=1.0,
    ) {
        let backoff = ExponentialBackoff::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
            factor,
        )
        .with_jitter_source(FixedJitter::new(sample));

        let clipped = clipped_ms(base_ms, max_ms, attempt) as f64;
        let delay = backoff.delay(attempt).as_millis() as f64;
        // Delays are floored to whole milliseconds; allow for float rounding.
        let lower = (clipped * (1.0 - factor) - 1e-6).max(0.0).floor();
        let upper = clipped * (1.0 + factor) + 1e-6;

        prop_assert!(delay >= lower, "delay {} below {}", delay, lower);
        prop_assert!(delay <= upper, "delay {} above {}", delay, upper);
    }

    #[test]
    fn prop_delay_never_decreases_without_jitter(
        base_ms in 0u64..1_000,
        attempt in 1u32..30,
    ) {
        let backoff = exponential_backoff(Some(Duration::from_millis(base_ms)));
        prop_assert!(backoff.delay(attempt + 1) >= backoff.delay(attempt));
    }
}

#[cfg(feature = "jitter")]
mod seeded {
    use super::*;
    use resolute::backoff::SeededJitter;

    proptest! {
        #[test]
        fn prop_seeded_jitter_within_bounds(seed in any::<u64>(), attempt in 1u32..12) {
            let backoff = ExponentialBackoff::new(
                Duration::from_millis(200),
                Duration::from_millis(8000),
                0.2,
            )
            .with_jitter_source(SeededJitter::new(seed));

            let clipped = clipped_ms(200, 8000, attempt) as f64;
            let delay = backoff.delay(attempt).as_millis() as f64;

            prop_assert!(delay >= (clipped * 0.8 - 1e-6).floor());
            prop_assert!(delay <= clipped * 1.2 + 1e-6);
        }
    }
}
