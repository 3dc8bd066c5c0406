//! Error payloads for the retry engines.
//!
//! [`ErrorInfo`] is the failure payload the Result-based engine is built
//! around. The engine reads exactly one thing from it, the `recoverable` flag
//! (through the [`Recoverable`] trait). Everything else (kind, context trail,
//! source chain) is carried along untouched for the caller.
//!
//! # Examples
//!
//! ```
//! use resolute::{ErrorInfo, ErrorKind, Recoverable};
//!
//! let err = ErrorInfo::from_kind(ErrorKind::Timeout, "upstream did not answer")
//!     .context("fetching user profile")
//!     .context("rendering dashboard");
//!
//! assert!(err.is_recoverable());
//! assert_eq!(err.context_trail().len(), 2);
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Whether a repeated attempt could plausibly succeed.
///
/// This is a contract established by whoever builds the error: transient
/// failures answer `true`, permanent ones `false`. The Result-based retry
/// engine uses it as its default continuation predicate.
pub trait Recoverable {
    /// Returns `true` if the failure is transient.
    fn is_recoverable(&self) -> bool;
}

impl<E: Recoverable + ?Sized> Recoverable for &E {
    fn is_recoverable(&self) -> bool {
        (**self).is_recoverable()
    }
}

impl<E: Recoverable + ?Sized> Recoverable for Box<E> {
    fn is_recoverable(&self) -> bool {
        (**self).is_recoverable()
    }
}

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Connection refused, reset, DNS failure.
    Network,
    /// The operation did not finish in time.
    Timeout,
    /// The remote side asked us to slow down.
    RateLimited,
    /// Input or response failed validation.
    Validation,
    /// The requested resource does not exist.
    NotFound,
    /// Missing or rejected credentials.
    Unauthorized,
    /// A bug or invariant violation on our side.
    Internal,
    /// Anything else.
    Other,
}

impl ErrorKind {
    /// Whether failures of this kind are usually worth retrying.
    ///
    /// ```
    /// use resolute::ErrorKind;
    ///
    /// assert!(ErrorKind::RateLimited.is_transient());
    /// assert!(!ErrorKind::Validation.is_transient());
    /// ```
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::RateLimited
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
            ErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure payload carrying a message, a recoverability flag and opaque
/// diagnostic data.
///
/// Context messages accumulate as the error travels outward, so the final
/// display reads as a breadcrumb trail:
///
/// ```
/// use resolute::ErrorInfo;
///
/// let err = ErrorInfo::new("connection refused")
///     .recoverable()
///     .context("connecting to database");
///
/// assert_eq!(err.to_string(), "connection refused\n  -> connecting to database");
/// ```
#[derive(Clone)]
pub struct ErrorInfo {
    message: String,
    recoverable: bool,
    kind: ErrorKind,
    context: Vec<String>,
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl ErrorInfo {
    /// Create a permanent error of kind [`ErrorKind::Other`].
    pub fn new(message: impl Into<String>) -> Self {
        ErrorInfo {
            message: message.into(),
            recoverable: false,
            kind: ErrorKind::Other,
            context: Vec::new(),
            source: None,
        }
    }

    /// Create an error whose recoverability follows [`ErrorKind::is_transient`].
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorInfo::new(message)
            .with_kind(kind)
            .with_recoverable(kind.is_transient())
    }

    /// Mark the error as transient.
    pub fn recoverable(self) -> Self {
        self.with_recoverable(true)
    }

    /// Mark the error as permanent.
    pub fn permanent(self) -> Self {
        self.with_recoverable(false)
    }

    /// Set the recoverability flag explicitly.
    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    /// Set the classification. Does not touch the recoverability flag.
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach the underlying cause.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: StdError + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Append a context layer, innermost first.
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        self.context.push(msg.into());
        self
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The classification.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// All context messages in the order they were added.
    pub fn context_trail(&self) -> &[String] {
        &self.context
    }
}

impl Recoverable for ErrorInfo {
    fn is_recoverable(&self) -> bool {
        self.recoverable
    }
}

impl fmt::Debug for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorInfo")
            .field("message", &self.message)
            .field("recoverable", &self.recoverable)
            .field("kind", &self.kind)
            .field("context", &self.context)
            .field("source", &self.source.as_ref().map(|s| s.to_string()))
            .finish()
    }
}

impl PartialEq for ErrorInfo {
    // Sources are compared by their rendered form; trait objects have no Eq.
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.recoverable == other.recoverable
            && self.kind == other.kind
            && self.context == other.context
            && self.source.as_ref().map(|s| s.to_string())
                == other.source.as_ref().map(|s| s.to_string())
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for ctx in &self.context {
            write!(f, "\n  -> {}", ctx)?;
        }
        Ok(())
    }
}

impl StdError for ErrorInfo {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|s| &**s as &(dyn StdError + 'static))
    }
}

/// Error produced by [`Outcome::unwrap_or_raise`](crate::Outcome::unwrap_or_raise).
///
/// Holds the failure's string form and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapError {
    message: String,
}

impl UnwrapError {
    /// Create an unwrap error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        UnwrapError {
            message: message.into(),
        }
    }

    /// The wrapped failure's string form.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UnwrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for UnwrapError {}

/// Error returned by [`with_timeout`](crate::retry::with_timeout).
///
/// Either the deadline passed, or the inner future finished with its own error
/// first.
///
/// # Examples
///
/// ```rust
/// use resolute::retry::with_timeout;
/// use resolute::TimeoutError;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let slow = async {
///     tokio::time::sleep(Duration::from_secs(10)).await;
///     Ok::<_, String>(42)
/// };
///
/// match with_timeout(slow, Duration::from_millis(10)).await {
///     Err(TimeoutError::Timeout { duration }) => {
///         assert_eq!(duration, Duration::from_millis(10));
///     }
///     _ => panic!("Expected timeout"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutError<E> {
    /// The deadline passed.
    Timeout {
        /// The deadline that was exceeded.
        duration: Duration,
    },
    /// The inner future failed before the deadline.
    Inner(E),
}

impl<E> TimeoutError<E> {
    /// Returns true if the deadline passed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if this wraps the inner error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }

    /// Get the inner error if present.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            Self::Timeout { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TimeoutError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { duration } => write!(f, "operation timed out after {:?}", duration),
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: StdError + 'static> StdError for TimeoutError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Timeout { .. } => None,
            Self::Inner(e) => Some(e),
        }
    }
}

impl<E: Recoverable> Recoverable for TimeoutError<E> {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Inner(e) => e.is_recoverable(),
        }
    }
}
