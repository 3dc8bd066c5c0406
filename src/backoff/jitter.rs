//! Random sources for jitter.
//!
//! Jitter is drawn through the [`JitterSource`] trait so tests can swap the
//! thread-local generator for a seeded or constant one.

use std::fmt;

/// A source of uniform samples in `[-1, 1]`.
pub trait JitterSource: Send + Sync + fmt::Debug {
    /// Draw the next sample. Values outside `[-1, 1]` are clamped by the caller.
    fn sample(&self) -> f64;
}

/// Always returns the same sample.
///
/// ```rust
/// use resolute::backoff::{FixedJitter, JitterSource};
///
/// assert_eq!(FixedJitter::new(-1.0).sample(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(f64);

impl FixedJitter {
    /// A source that always yields `sample`.
    pub fn new(sample: f64) -> Self {
        FixedJitter(sample)
    }
}

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Draws from the thread-local generator.
#[cfg(feature = "jitter")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

#[cfg(feature = "jitter")]
impl JitterSource for ThreadRngJitter {
    fn sample(&self) -> f64 {
        use rand::Rng;
        rand::rng().random_range(-1.0..=1.0)
    }
}

/// Draws from a seeded generator, for reproducible runs.
#[cfg(feature = "jitter")]
#[derive(Debug)]
pub struct SeededJitter {
    rng: std::sync::Mutex<rand::rngs::StdRng>,
}

#[cfg(feature = "jitter")]
impl SeededJitter {
    /// Create a generator from a seed. Equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        SeededJitter {
            rng: std::sync::Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

#[cfg(feature = "jitter")]
impl JitterSource for SeededJitter {
    fn sample(&self) -> f64 {
        use rand::Rng;
        // Generator state is always valid, so a poisoned lock is reusable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(-1.0..=1.0)
    }
}

/// The source used when none is configured.
pub(crate) fn default_source() -> std::sync::Arc<dyn JitterSource> {
    #[cfg(feature = "jitter")]
    {
        std::sync::Arc::new(ThreadRngJitter)
    }
    #[cfg(not(feature = "jitter"))]
    {
        std::sync::Arc::new(FixedJitter::new(0.0))
    }
}
