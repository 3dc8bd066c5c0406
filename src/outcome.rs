//! A closed success/failure container for exception-free error handling.
//!
//! `Outcome<T, E>` plays the same role as `std::result::Result`, but it is the
//! value the Result-based retry engine speaks: operations return an `Outcome`,
//! and the engine hands the last one back to the caller instead of raising.
//!
//! # Crossing the boundary
//!
//! Two functions move between the "errors as values" world and ordinary
//! `Result`-with-`?` control flow:
//!
//! - [`try_async`] / [`try_sync`] capture a fallible computation as an `Outcome`
//! - [`Outcome::unwrap_or_raise`] turns a failure back into an `Err`
//!
//! # Examples
//!
//! ```rust
//! use resolute::Outcome;
//!
//! let parsed: Outcome<i32, String> = Outcome::success(21);
//! let doubled = parsed.map(|x| x * 2);
//! assert_eq!(doubled.unwrap_or(0), 42);
//!
//! let failed: Outcome<i32, String> = Outcome::failure("bad input".to_string());
//! assert_eq!(failed.map(|x| x * 2).unwrap_or(0), 0);
//! ```

use std::future::Future;

use crate::error::UnwrapError;

/// A value that is either a `Success(T)` or a `Failure(E)`.
///
/// Exactly one variant is ever present, and an `Outcome` is never mutated
/// in place: every combinator consumes `self` and builds a new value.
///
/// # Example
///
/// ```rust
/// use resolute::Outcome;
///
/// let ok: Outcome<i32, &str> = Outcome::success(42);
/// let err: Outcome<i32, &str> = Outcome::failure("boom");
///
/// assert!(ok.is_success());
/// assert!(err.is_failure());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "this `Outcome` may be a failure, which should be handled"]
pub enum Outcome<T, E> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed with an error.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    // ========== Constructors ==========

    /// Create a successful outcome.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// let o = Outcome::<i32, String>::success(42);
    /// assert!(o.is_success());
    /// ```
    #[inline]
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Create a failed outcome.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// let o = Outcome::<i32, &str>::failure("error");
    /// assert!(o.is_failure());
    /// ```
    #[inline]
    pub fn failure(error: E) -> Self {
        Outcome::Failure(error)
    }

    /// Create an outcome from a `Result`.
    #[inline]
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }

    /// Convert this outcome into a `Result`.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// assert_eq!(Outcome::<_, String>::success(1).into_result(), Ok(1));
    /// assert_eq!(Outcome::<i32, _>::failure("e").into_result(), Err("e"));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }

    // ========== Predicates ==========

    /// Returns `true` if this is a `Success`.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` if this is a `Failure`.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    // ========== Extractors ==========

    /// Returns the success value if present.
    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the error if present.
    #[inline]
    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    /// Convert to `Outcome<&T, &E>`.
    #[inline]
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns the success value, or `fallback` on failure. Never panics.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// assert_eq!(Outcome::<_, &str>::success(7).unwrap_or(0), 7);
    /// assert_eq!(Outcome::<i32, _>::failure("nope").unwrap_or(0), 0);
    /// ```
    #[inline]
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => fallback,
        }
    }

    /// Re-enter `?`-based control flow with a caller-chosen error type.
    ///
    /// The transform runs only on failure.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// let o = Outcome::<i32, &str>::failure("disk full");
    /// let r: Result<i32, String> = o.unwrap_or_raise_with(|e| format!("write failed: {e}"));
    /// assert_eq!(r, Err("write failed: disk full".to_string()));
    /// ```
    #[inline]
    pub fn unwrap_or_raise_with<E2, F>(self, transform: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(transform(error)),
        }
    }

    /// Fold both variants into a single value.
    #[inline]
    pub fn fold<U, F, G>(self, on_success: F, on_failure: G) -> U
    where
        F: FnOnce(T) -> U,
        G: FnOnce(E) -> U,
    {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    // ========== Transformations ==========

    /// Transform the success value. Failures pass through and `f` is not called.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// let o = Outcome::<_, String>::success(5).map(|x| x * 2);
    /// assert_eq!(o, Outcome::Success(10));
    /// ```
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Chain a computation that itself returns an `Outcome`.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// fn half(x: i32) -> Outcome<i32, String> {
    ///     if x % 2 == 0 {
    ///         Outcome::success(x / 2)
    ///     } else {
    ///         Outcome::failure(format!("{x} is odd"))
    ///     }
    /// }
    ///
    /// assert_eq!(Outcome::success(8).and_then(half), Outcome::Success(4));
    /// assert_eq!(
    ///     Outcome::success(3).and_then(half),
    ///     Outcome::Failure("3 is odd".to_string())
    /// );
    /// ```
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transform the error. Successes pass through and `f` is not called.
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    /// Async counterpart of [`map`](Self::map): the transform is awaited.
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let o = Outcome::<_, String>::success(20)
    ///     .map_async(|x| async move { x + 1 })
    ///     .await;
    /// assert_eq!(o, Outcome::Success(21));
    /// # });
    /// ```
    pub async fn map_async<U, F, Fut>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value).await),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Async counterpart of [`and_then`](Self::and_then).
    pub async fn and_then_async<U, F, Fut>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U, E>>,
    {
        match self {
            Outcome::Success(value) => f(value).await,
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }
}

impl<T, E: std::fmt::Display> Outcome<T, E> {
    /// Re-enter `?`-based control flow, wrapping the error's string form.
    ///
    /// This is the default transform of [`unwrap_or_raise_with`](Self::unwrap_or_raise_with).
    ///
    /// ```rust
    /// use resolute::Outcome;
    ///
    /// fn load() -> Result<i32, resolute::UnwrapError> {
    ///     let value = Outcome::<i32, &str>::success(3).unwrap_or_raise()?;
    ///     Ok(value * 2)
    /// }
    ///
    /// assert_eq!(load().unwrap(), 6);
    ///
    /// let err = Outcome::<i32, &str>::failure("missing key").unwrap_or_raise().unwrap_err();
    /// assert_eq!(err.message(), "missing key");
    /// ```
    #[inline]
    pub fn unwrap_or_raise(self) -> Result<T, UnwrapError> {
        self.unwrap_or_raise_with(|error| UnwrapError::new(error.to_string()))
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Outcome::from_result(result)
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

/// Await a fallible future and capture its result as an `Outcome`.
///
/// An `Err` returned by the future becomes a `Failure`; this is the sanctioned
/// way to bring `?`-style code into the `Outcome` world.
///
/// ```rust
/// use resolute::{try_async, Outcome};
///
/// async fn fetch(id: u32) -> Result<String, String> {
///     if id == 0 { Err("no such id".into()) } else { Ok(format!("item-{id}")) }
/// }
///
/// # tokio_test::block_on(async {
/// assert_eq!(try_async(fetch(7)).await, Outcome::Success("item-7".to_string()));
/// assert!(try_async(fetch(0)).await.is_failure());
/// # });
/// ```
pub async fn try_async<T, E, Fut>(future: Fut) -> Outcome<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    Outcome::from_result(future.await)
}

/// Run a fallible closure and capture its result as an `Outcome`.
pub fn try_sync<T, E, F>(f: F) -> Outcome<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    Outcome::from_result(f())
}

/// Collect a sequence of outcomes into an outcome of a sequence.
///
/// Returns `Success` with every value in order when all elements succeed;
/// otherwise returns the earliest `Failure`.
///
/// ```rust
/// use resolute::{all, Outcome};
///
/// let ok: Vec<Outcome<i32, &str>> = vec![Outcome::success(1), Outcome::success(2)];
/// assert_eq!(all(ok), Outcome::Success(vec![1, 2]));
///
/// let mixed = vec![Outcome::success(1), Outcome::failure("e1"), Outcome::failure("e2")];
/// assert_eq!(all(mixed), Outcome::Failure("e1"));
/// ```
pub fn all<T, E, I>(outcomes: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let iter = outcomes.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    for outcome in iter {
        match outcome {
            Outcome::Success(value) => values.push(value),
            Outcome::Failure(error) => return Outcome::Failure(error),
        }
    }
    Outcome::Success(values)
}
