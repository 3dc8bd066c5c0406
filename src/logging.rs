//! A small pluggable logger for code built on the retry engines.
//!
//! The engines never log on their own. Callers that want a trace of each
//! retry wire a [`Logger`] into [`RetryOptions::with_on_retry`] through
//! [`log_retries`].
//!
//! A [`LogSink`] receives `(level, message)` pairs. [`Logger`] adds a level
//! filter and key/value context on top of a sink. Adding context never
//! mutates a logger: [`Logger::with_context`] returns a new one.
//!
//! [`RetryOptions::with_on_retry`]: crate::RetryOptions::with_on_retry
//!
//! # Examples
//!
//! ```rust
//! use resolute::logging::{LogLevel, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone()).with_min_level(LogLevel::Info);
//! let request_logger = logger.with_context("request_id", "abc123");
//!
//! request_logger.info(format_args!("fetching {}", "/users"));
//! request_logger.debug(format_args!("filtered out"));
//! logger.warn(format_args!("no context here"));
//!
//! assert_eq!(
//!     sink.records(),
//!     vec![
//!         (LogLevel::Info, "[request_id=abc123] fetching /users".to_string()),
//!         (LogLevel::Warn, "no context here".to_string()),
//!     ]
//! );
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Per-attempt tracing.
    #[default]
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected but handled.
    Warn,
    /// An operation failed.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    /// Record one message.
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, fmt::Arguments<'_>) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        self(level, message)
    }
}

/// Forwards records to the `tracing` macros at the matching level.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every record in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything logged so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogLevel, String)>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        self.lock().push((level, message.to_string()));
    }
}

/// A sink plus a minimum level and key/value context.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    min_level: LogLevel,
    context: Arc<[(String, String)]>,
}

impl Logger {
    /// A logger writing everything to `sink`.
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Logger {
            sink: Arc::new(sink),
            min_level: LogLevel::Debug,
            context: Arc::from(Vec::new()),
        }
    }

    /// A logger writing to the `tracing` macros.
    #[cfg(feature = "tracing")]
    pub fn tracing() -> Self {
        Logger::new(TracingSink)
    }

    /// Drop records below `level`.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// A new logger with one more context field. `self` is left unchanged.
    pub fn with_context(&self, key: impl Into<String>, value: impl fmt::Display) -> Logger {
        let mut context = self.context.to_vec();
        context.push((key.into(), value.to_string()));
        Logger {
            sink: self.sink.clone(),
            min_level: self.min_level,
            context: context.into(),
        }
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write a record at `level`, prefixed with the context fields.
    pub fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        if self.context.is_empty() {
            self.sink.log(level, message);
        } else {
            self.sink
                .log(level, format_args!("[{}] {}", ContextFields(&self.context), message));
        }
    }

    /// Write at [`LogLevel::Debug`].
    pub fn debug(&self, message: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, message);
    }

    /// Write at [`LogLevel::Info`].
    pub fn info(&self, message: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, message);
    }

    /// Write at [`LogLevel::Warn`].
    pub fn warn(&self, message: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, message);
    }

    /// Write at [`LogLevel::Error`].
    pub fn error(&self, message: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

struct ContextFields<'a>(&'a [(String, String)]);

impl fmt::Display for ContextFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Build an `on_retry` observer that logs each retried failure at debug level.
///
/// ```rust
/// use resolute::logging::{log_retries, Logger, MemorySink};
/// use resolute::backoff::NoBackoff;
/// use resolute::{retry_async, RetryOptions};
///
/// # tokio_test::block_on(async {
/// let sink = MemorySink::new();
/// let logger = Logger::new(sink.clone());
///
/// let _ = retry_async(
///     || async { Err::<(), _>("connection reset") },
///     RetryOptions::new(1)
///         .with_backoff(NoBackoff)
///         .with_on_retry(log_retries(logger, "GET /health")),
/// )
/// .await;
///
/// assert_eq!(sink.records().len(), 1);
/// assert!(sink.records()[0].1.contains("attempt 1"));
/// # });
/// ```
pub fn log_retries<E>(
    logger: Logger,
    operation: impl Into<String>,
) -> impl Fn(u32, &E) + Send + Sync + 'static
where
    E: fmt::Display,
{
    let operation = operation.into();
    move |attempt: u32, error: &E| {
        logger.debug(format_args!(
            "retrying {} after attempt {} failed: {}",
            operation, attempt, error
        ));
    }
}
