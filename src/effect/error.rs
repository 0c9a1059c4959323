//! Failure values for the effect system.
//!
//! This module provides the opaque [`Failure`] value carried by failed
//! actions, together with the concrete error types the library itself
//! raises. Error values are deliberately untyped at the action level:
//! handlers receive a [`Failure`] and may inspect it via
//! [`Failure::downcast_ref`], but nothing in the combinator set depends on
//! a concrete error type.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// An opaque failure value produced by a failed action.
///
/// `Failure` wraps any [`std::error::Error`] behind a shared pointer, so it
/// is cheap to clone and can flow through re-runnable action graphs. The
/// wrapped error is reachable through [`source`](std::error::Error::source)
/// or [`downcast_ref`](Failure::downcast_ref).
///
/// # Examples
///
/// ```rust
/// use deferio::effect::Failure;
///
/// let failure = Failure::message("disk on fire");
/// assert_eq!(failure.to_string(), "disk on fire");
/// ```
#[derive(Clone)]
pub struct Failure {
    inner: Arc<dyn Error + Send + Sync>,
}

impl Failure {
    /// Wraps a concrete error in a `Failure`.
    ///
    /// # Arguments
    ///
    /// * `error` - Any error type implementing [`std::error::Error`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::Failure;
    ///
    /// let failure = Failure::new(std::io::Error::other("broken pipe"));
    /// assert_eq!(failure.to_string(), "broken pipe");
    /// ```
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates a `Failure` from a plain message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::Failure;
    ///
    /// let failure = Failure::message("nothing to read");
    /// assert_eq!(failure.to_string(), "nothing to read");
    /// ```
    pub fn message<M: fmt::Display>(message: M) -> Self {
        Self::new(MessageError {
            message: message.to_string(),
        })
    }

    /// Converts a caught panic payload into a `Failure`.
    ///
    /// Panic payloads are usually `&str` or `String`; anything else is
    /// reported with a generic message.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::new(PanicError { message })
    }

    /// Returns a reference to the wrapped error if it is of type `E`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::{Failure, GuardError};
    ///
    /// let failure = Failure::new(GuardError);
    /// assert!(failure.downcast_ref::<GuardError>().is_some());
    /// ```
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.inner)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Failure").field(&self.inner).finish()
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let inner: &(dyn Error + 'static) = self.inner.as_ref();
        Some(inner)
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Self::new(error)
    }
}

/// Error type carrying a plain text message.
///
/// Produced by [`Failure::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageError {
    /// The message text.
    pub message: String,
}

impl fmt::Display for MessageError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.message)
    }
}

impl Error for MessageError {}

/// Error type representing a failed guard condition.
///
/// Raised by [`Action::guard`](super::Action::guard) when its condition is
/// false, aborting the surrounding chain.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::GuardError;
///
/// assert_eq!(GuardError.to_string(), "assertion failed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardError;

impl fmt::Display for GuardError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "assertion failed")
    }
}

impl Error for GuardError {}

/// Error type carrying the message of a caught panic.
///
/// Panics raised inside a running action are converted to this error so
/// that both failure channels (a panic during execution and an ordinary
/// `Err` outcome) are observable through the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicError {
    /// The panic message, when one could be extracted.
    pub message: String,
}

impl fmt::Display for PanicError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.message)
    }
}

impl Error for PanicError {}
