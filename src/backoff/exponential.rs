//! Exponential backoff with proportional jitter.

use std::sync::Arc;
use std::time::Duration;

use super::jitter::{default_source, JitterSource};
use super::options::BackoffOptions;
use super::Backoff;

/// Exponential delay growth, capped, with optional proportional jitter.
///
/// For attempt `n` (1-indexed):
///
/// 1. `exponential = base * 2^(n - 1)`
/// 2. `clipped = min(exponential, max)`
/// 3. with `factor > 0`: `floor(clipped + clipped * factor * sample)` clamped
///    at zero, where `sample` is uniform in `[-1, 1]`; with `factor == 0` the
///    delay is `clipped` and no sample is drawn.
///
/// # Examples
///
/// ```rust
/// use resolute::backoff::{Backoff, ExponentialBackoff};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_millis(500), 0.0);
///
/// assert_eq!(backoff.delay(1), Duration::from_millis(100));
/// assert_eq!(backoff.delay(2), Duration::from_millis(200));
/// assert_eq!(backoff.delay(3), Duration::from_millis(400));
/// assert_eq!(backoff.delay(4), Duration::from_millis(500)); // capped
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
    jitter_factor: f64,
    source: Arc<dyn JitterSource>,
}

impl ExponentialBackoff {
    /// Create a backoff from explicit parameters.
    ///
    /// `jitter_factor` is clamped to `[0, 1]`.
    pub fn new(base: Duration, max: Duration, jitter_factor: f64) -> Self {
        Self::from_options(
            BackoffOptions::new()
                .with_base_delay(base)
                .with_max_delay(max)
                .with_jitter_factor(jitter_factor),
        )
    }

    /// Resolve partially-specified options against the library defaults.
    pub fn from_options(options: BackoffOptions) -> Self {
        ExponentialBackoff {
            base: options.base_delay(),
            max: options.max_delay(),
            jitter_factor: options.jitter_factor(),
            source: default_source(),
        }
    }

    /// Draw jitter from `source` instead of the thread-local generator.
    ///
    /// ```rust
    /// use resolute::backoff::{Backoff, ExponentialBackoff, FixedJitter};
    /// use std::time::Duration;
    ///
    /// let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(8), 0.5)
    ///     .with_jitter_source(FixedJitter::new(1.0));
    ///
    /// // 100ms + 100ms * 0.5 * 1.0
    /// assert_eq!(backoff.delay(1), Duration::from_millis(150));
    /// ```
    pub fn with_jitter_source<S>(mut self, source: S) -> Self
    where
        S: JitterSource + 'static,
    {
        self.source = Arc::new(source);
        self
    }

    /// Base delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Delay cap.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Jitter factor in `[0, 1]`.
    pub fn jitter_factor(&self) -> f64 {
        self.jitter_factor
    }

    /// The capped exponential delay before jitter.
    ///
    /// Attempt `0` is treated as attempt `1`.
    pub fn clipped_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let exponential = match 1u32.checked_shl(exponent) {
            Some(multiplier) => self.base.checked_mul(multiplier),
            None if self.base.is_zero() => Some(Duration::ZERO),
            None => None,
        };
        exponential.unwrap_or(Duration::MAX).min(self.max)
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let clipped = self.clipped_delay(attempt);
        if self.jitter_factor <= 0.0 {
            return clipped;
        }

        let sample = self.source.sample().clamp(-1.0, 1.0);
        let clipped_ms = clipped.as_nanos() as f64 / 1_000_000.0;
        let jitter = clipped_ms * self.jitter_factor * sample;
        let final_ms = (clipped_ms + jitter).floor().max(0.0);
        Duration::from_millis(final_ms as u64)
    }
}
