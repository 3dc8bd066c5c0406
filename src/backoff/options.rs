//! Backoff configuration.

use std::time::Duration;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
/// Default cap on any single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(8000);
/// Default proportional jitter (±20%).
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Partially-specified backoff configuration.
///
/// Every field is optional; unset fields fall back to
/// [`DEFAULT_BASE_DELAY`], [`DEFAULT_MAX_DELAY`] and [`DEFAULT_JITTER_FACTOR`]
/// when the options are turned into an
/// [`ExponentialBackoff`](super::ExponentialBackoff). Options are plain data
/// and are reused unchanged across every attempt of a retry session.
///
/// # Examples
///
/// ```rust
/// use resolute::BackoffOptions;
/// use std::time::Duration;
///
/// let options = BackoffOptions::new()
///     .with_base_delay(Duration::from_millis(50))
///     .with_jitter_factor(0.0);
///
/// assert_eq!(options.base_delay(), Duration::from_millis(50));
/// assert_eq!(options.max_delay(), Duration::from_secs(8));
/// assert_eq!(options.jitter_factor(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackoffOptions {
    /// Delay before the first retry.
    pub base_delay: Option<Duration>,
    /// Upper bound on any computed delay, applied before jitter.
    pub max_delay: Option<Duration>,
    /// Fraction in `[0, 1]` by which a delay may be randomly shifted.
    pub jitter_factor: Option<f64>,
}

impl BackoffOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Set the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter factor. Values outside `[0, 1]` are clamped, NaN is
    /// treated as zero.
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = Some(factor);
        self
    }

    /// The base delay, or the default.
    pub fn base_delay(&self) -> Duration {
        self.base_delay.unwrap_or(DEFAULT_BASE_DELAY)
    }

    /// The maximum delay, or the default.
    pub fn max_delay(&self) -> Duration {
        self.max_delay.unwrap_or(DEFAULT_MAX_DELAY)
    }

    /// The jitter factor clamped to `[0, 1]`, or the default.
    pub fn jitter_factor(&self) -> f64 {
        match self.jitter_factor {
            Some(factor) if factor.is_nan() => 0.0,
            Some(factor) => factor.clamp(0.0, 1.0),
            None => DEFAULT_JITTER_FACTOR,
        }
    }
}
