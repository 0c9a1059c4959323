//! `Action` Monad - Deferred asynchronous side effect handling.
//!
//! The `Action` type represents an asynchronous computation that may perform
//! side effects. Side effects are not executed until `run` is awaited,
//! maintaining referential transparency in pure code.
//!
//! # Design Philosophy
//!
//! `Action` "describes" side effects but doesn't "execute" them. Execution
//! happens only via `run().await`, which should be called at the program's
//! "edge" (e.g., in the main function). An `Action` is a plain immutable
//! value: it can be stored, cloned, and run any number of times, and every
//! run re-performs the underlying effect from scratch. Nothing is memoized.
//!
//! # Examples
//!
//! ```rust,ignore
//! use deferio::effect::Action;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create a pure action
//!     let action = Action::pure(42);
//!     assert_eq!(action.run().await.unwrap(), 42);
//!
//!     // Chain actions
//!     let action = Action::pure(10)
//!         .fmap(|x| x * 2)
//!         .flat_map(|x| Action::pure(x + 1));
//!     assert_eq!(action.run().await.unwrap(), 21);
//! }
//! ```
//!
//! # Side Effect Deferral
//!
//! ```rust,ignore
//! use deferio::effect::Action;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let executions = Arc::new(AtomicUsize::new(0));
//!     let executions_clone = executions.clone();
//!
//!     let action = Action::new(move || {
//!         let counter = executions_clone.clone();
//!         async move {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!             Ok(42)
//!         }
//!     });
//!
//!     // Not executed yet
//!     assert_eq!(executions.load(Ordering::SeqCst), 0);
//!
//!     // Every run re-executes the effect
//!     let _ = action.run().await;
//!     let _ = action.run().await;
//!     assert_eq!(executions.load(Ordering::SeqCst), 2);
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};

use super::error::{Failure, GuardError};

/// The future produced by one invocation of an action's executor.
type BoxedOutcome<A> = Pin<Box<dyn Future<Output = Result<A, Failure>> + Send>>;

/// A monad representing deferred, re-runnable side effects.
///
/// `Action<A>` wraps an executor that, when invoked, begins one independent
/// execution of the effect and eventually settles as `Ok(A)` or
/// `Err(Failure)`. The executor is not invoked until [`run`](Action::run)
/// is awaited.
///
/// Cloning an `Action` is cheap: clones share the executor, and each clone
/// (or repeated run of the same value) re-performs the effect.
///
/// # Type Parameters
///
/// - `A`: The type of the value produced by the action.
///
/// # Monad Laws
///
/// `Action` satisfies the monad laws:
///
/// 1. **Left Identity**: `Action::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(Action::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
///
/// # Examples
///
/// ```rust,ignore
/// use deferio::effect::Action;
///
/// #[tokio::main]
/// async fn main() {
///     let action = Action::pure(42);
///     assert_eq!(action.run().await.unwrap(), 42);
/// }
/// ```
pub struct Action<A> {
    /// The shared executor that begins one execution of the effect.
    executor: Arc<dyn Fn() -> BoxedOutcome<A> + Send + Sync>,
}

impl<A> Clone for Action<A> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: 'static> Action<A> {
    /// Creates a new `Action` from a closure producing a future.
    ///
    /// The closure is invoked afresh on every run, so the action can be
    /// executed any number of times. It is not invoked until `run` is
    /// awaited.
    ///
    /// # Arguments
    ///
    /// * `executor` - A closure that returns a future settling as
    ///   `Result<A, Failure>`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::new(|| async {
    ///     tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    ///     Ok(42)
    /// });
    /// ```
    pub fn new<F, Fut>(executor: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A, Failure>> + Send + 'static,
    {
        Self {
            executor: Arc::new(move || Box::pin(executor())),
        }
    }

    /// Creates an action that fails with the given error without performing
    /// any side effect.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::{Action, Failure};
    ///
    /// let action: Action<i32> = Action::fail(Failure::message("out of cheese"));
    /// assert!(action.run().await.is_err());
    /// ```
    #[must_use]
    pub fn fail(error: Failure) -> Self {
        Self::new(move || {
            let error = error.clone();
            async move { Err(error) }
        })
    }
}

impl<A: Clone + Send + Sync + 'static> Action<A> {
    /// Wraps a pure value in an action.
    ///
    /// The resulting action succeeds immediately with a clone of the value
    /// and performs no side effect.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(42);
    /// // run().await will immediately return Ok(42)
    /// ```
    pub fn pure(value: A) -> Self {
        Self::new(move || {
            let value = value.clone();
            async move { Ok(value) }
        })
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A: 'static> Action<A> {
    /// Executes the action once and returns its outcome.
    ///
    /// This is the only way to extract a value from an action, and should
    /// be called at the program's "edge". Awaiting `run` again re-performs
    /// the effect: actions are never memoized.
    ///
    /// Every failure channel is normalized here: a panic while invoking the
    /// executor, a panic while polling the produced future, and an ordinary
    /// `Err` outcome all surface as `Err(Failure)`, so
    /// [`catch`](Action::catch) observes them uniformly.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] the effect settled with, or a failure
    /// carrying the panic message if the effect panicked.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let action = Action::pure(42);
    ///     assert_eq!(action.run().await.unwrap(), 42);
    /// }
    /// ```
    pub async fn run(&self) -> Result<A, Failure> {
        match catch_unwind(AssertUnwindSafe(|| (self.executor)())) {
            Ok(future) => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Err(Failure::from_panic(payload)),
            },
            Err(payload) => Err(Failure::from_panic(payload)),
        }
    }
}

impl<A: Send + 'static> Action<A> {
    /// Begins evaluation on the runtime without blocking the caller.
    ///
    /// The returned handle can be awaited for the outcome, or dropped to
    /// let the effect run detached; a detached effect still runs to
    /// completion.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let handle = Action::pure(42).spawn();
    /// assert_eq!(handle.await.unwrap().unwrap(), 42);
    /// ```
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<A, Failure>> {
        tokio::spawn(async move { self.run().await })
    }
}

// =============================================================================
// Functor Operations
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Transforms the result of an action using a function.
    ///
    /// This is the `fmap` operation from Functor. The action's own effects
    /// are unchanged; only its success value is mapped.
    ///
    /// # Arguments
    ///
    /// * `function` - A function to apply to the success value.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(21).fmap(|x| x * 2);
    /// assert_eq!(action.run().await.unwrap(), 42);
    /// ```
    pub fn fmap<B, F>(self, function: F) -> Action<B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        Action::new(move || {
            let this = self.clone();
            let function = Arc::clone(&function);
            async move { Ok(function(this.run().await?)) }
        })
    }

    /// Discards the result of an action, succeeding with unit.
    ///
    /// The action's effects still occur.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(42).ignore();
    /// assert_eq!(action.run().await.unwrap(), ());
    /// ```
    #[must_use]
    pub fn ignore(self) -> Action<()> {
        self.fmap(|_| ())
    }
}

// =============================================================================
// Applicative Operations
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Applies an action-wrapped function to this action's value.
    ///
    /// The function action runs first, THEN this action, then the function
    /// is applied. The ordering is deliberate: `apply` is a sequencing
    /// operator, not a concurrent one, which makes [`map2`](Action::map2)
    /// run its two operands in sequence, unlike [`all`](Action::all).
    ///
    /// # Arguments
    ///
    /// * `function_action` - An action producing a function.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let function_action = Action::pure(|x: i32| x * 2);
    /// let result = Action::pure(21).apply(function_action).run().await;
    /// assert_eq!(result.unwrap(), 42);
    /// ```
    #[must_use]
    pub fn apply<B, F>(self, function_action: Action<F>) -> Action<B>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        Action::new(move || {
            let function_action = function_action.clone();
            let value_action = self.clone();
            async move {
                let function = function_action.run().await?;
                let value = value_action.run().await?;
                Ok(function(value))
            }
        })
    }

    /// Combines two actions with a binary function.
    ///
    /// This is the classic `lift2`, built on [`apply`](Action::apply): the
    /// receiver is fully run before `other` begins. Sequential, not
    /// concurrent, despite visually resembling a parallel combination.
    ///
    /// # Arguments
    ///
    /// * `other` - The second action.
    /// * `function` - A function combining both success values.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let combined = Action::pure(10).map2(Action::pure(20), |a, b| a + b);
    /// assert_eq!(combined.run().await.unwrap(), 30);
    /// ```
    pub fn map2<B, C, F>(self, other: Action<B>, function: F) -> Action<C>
    where
        F: Fn(A, B) -> C + Send + Sync + 'static,
        B: Send + 'static,
        C: Send + 'static,
    {
        let function = Arc::new(function);
        other.apply(self.fmap(move |value_a| {
            let function = Arc::clone(&function);
            move |value_b| function(value_a, value_b)
        }))
    }

    /// Combines two actions into a tuple, running them in sequence.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let result = Action::pure(10).product(Action::pure(20)).run().await;
    /// assert_eq!(result.unwrap(), (10, 20));
    /// ```
    #[must_use]
    pub fn product<B>(self, other: Action<B>) -> Action<(A, B)>
    where
        B: Send + 'static,
    {
        self.map2(other, |value_a, value_b| (value_a, value_b))
    }
}

// =============================================================================
// Monad Operations
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Chains actions, passing the result of the first to a function that
    /// produces the second.
    ///
    /// This is the `bind` operation from Monad: left-to-right sequencing
    /// with a data dependency. The second action never starts before the
    /// first has completed successfully.
    ///
    /// # Arguments
    ///
    /// * `function` - A function from the success value to the next action.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(10).flat_map(|x| Action::pure(x * 2));
    /// assert_eq!(action.run().await.unwrap(), 20);
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> Action<B>
    where
        F: Fn(A) -> Action<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        Action::new(move || {
            let this = self.clone();
            let function = Arc::clone(&function);
            async move {
                let value = this.run().await?;
                function(value).run().await
            }
        })
    }

    /// Alias for `flat_map`.
    ///
    /// This is the conventional Rust name for monadic bind.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(10).and_then(|x| Action::pure(x + 5));
    /// assert_eq!(action.run().await.unwrap(), 15);
    /// ```
    pub fn and_then<B, F>(self, function: F) -> Action<B>
    where
        F: Fn(A) -> Action<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// Sequences two actions, discarding the result of the first.
    ///
    /// The first action is still executed for its side effects, and its
    /// failure short-circuits the pair.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(10).then(Action::pure(20));
    /// assert_eq!(action.run().await.unwrap(), 20);
    /// ```
    #[must_use]
    pub fn then<B>(self, next: Action<B>) -> Action<B>
    where
        B: Send + 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Sequences two actions, discarding the result of the second.
    ///
    /// `next` still runs for its side effects (and its failure still
    /// propagates), but the externally visible value is the receiver's.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(10).left(Action::pure(20));
    /// assert_eq!(action.run().await.unwrap(), 10);
    /// ```
    #[must_use]
    pub fn left<B>(self, next: Action<B>) -> Self
    where
        B: Send + 'static,
    {
        Action::new(move || {
            let this = self.clone();
            let next = next.clone();
            async move {
                let value = this.run().await?;
                next.run().await?;
                Ok(value)
            }
        })
    }
}

// =============================================================================
// Failure Handling
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Recovers from a failure by switching to a replacement action.
    ///
    /// The handler observes every failure category uniformly: a panic while
    /// invoking the executor, a panic while polling the future, and an
    /// ordinary `Err` outcome (all normalized by [`run`](Action::run)). On
    /// success the handler is never invoked.
    ///
    /// # Arguments
    ///
    /// * `handler` - A function from the failure to a replacement action.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::{Action, Failure};
    ///
    /// let action = Action::<i32>::fail(Failure::message("oops"))
    ///     .catch(|_| Action::pure(0));
    /// assert_eq!(action.run().await.unwrap(), 0);
    /// ```
    pub fn catch<F>(self, handler: F) -> Self
    where
        F: Fn(Failure) -> Self + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Self::new(move || {
            let this = self.clone();
            let handler = Arc::clone(&handler);
            async move {
                match this.run().await {
                    Ok(value) => Ok(value),
                    Err(error) => handler(error).run().await,
                }
            }
        })
    }

    /// Observes a failure without recovering from it.
    ///
    /// The callback runs only on failure; the failure is then propagated
    /// unchanged. Useful for diagnostics.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::{Action, Failure};
    ///
    /// let action = Action::<i32>::fail(Failure::message("oops"))
    ///     .on_error(|error| eprintln!("failed: {error}"));
    /// ```
    pub fn on_error<F>(self, callback: F) -> Self
    where
        F: Fn(&Failure) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        Self::new(move || {
            let this = self.clone();
            let callback = Arc::clone(&callback);
            async move {
                let outcome = this.run().await;
                if let Err(ref error) = outcome {
                    callback(error);
                }
                outcome
            }
        })
    }
}

// =============================================================================
// Concurrency Combinators
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Runs every action concurrently and collects the results in input
    /// order.
    ///
    /// All executors are started at once, without waiting for any
    /// predecessor; waits overlap. If any action fails, the aggregate fails
    /// with the first failure observed (in completion order). Sibling
    /// actions are NOT cancelled: each runs to completion on its own task,
    /// and results of siblings of a failed action are discarded.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let actions = vec![Action::pure(1), Action::pure(2), Action::pure(3)];
    /// let results = Action::all(actions).run().await.unwrap();
    /// assert_eq!(results, vec![1, 2, 3]);
    /// ```
    pub fn all(actions: Vec<Self>) -> Action<Vec<A>> {
        Action::new(move || {
            let actions = actions.clone();
            async move {
                let total = actions.len();
                let mut pending = FuturesUnordered::new();
                for (index, action) in actions.into_iter().enumerate() {
                    let handle = tokio::spawn(async move { action.run().await });
                    pending.push(async move { (index, handle.await) });
                }

                let mut slots: Vec<Option<A>> =
                    std::iter::repeat_with(|| None).take(total).collect();
                while let Some((index, joined)) = pending.next().await {
                    match joined {
                        Ok(Ok(value)) => slots[index] = Some(value),
                        Ok(Err(error)) => return Err(error),
                        Err(join_error) => return Err(Failure::new(join_error)),
                    }
                }
                Ok(slots.into_iter().flatten().collect())
            }
        })
    }

    /// Runs the actions strictly left to right and collects the results.
    ///
    /// Action *i* starts only after action *i−1* has completed
    /// successfully. The first failure short-circuits: later actions are
    /// never started. An empty input succeeds with an empty vector without
    /// executing anything.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let actions = vec![Action::pure(1), Action::pure(2), Action::pure(3)];
    /// let results = Action::sequence(actions).run().await.unwrap();
    /// assert_eq!(results, vec![1, 2, 3]);
    /// ```
    pub fn sequence(actions: Vec<Self>) -> Action<Vec<A>> {
        Action::new(move || {
            let actions = actions.clone();
            async move {
                let mut results = Vec::with_capacity(actions.len());
                for action in &actions {
                    results.push(action.run().await?);
                }
                Ok(results)
            }
        })
    }

    /// Repeats the action indefinitely, discarding each success value.
    ///
    /// Terminates only when an iteration fails; that failure propagates.
    /// Each iteration yields back to the scheduler, so unbounded repetition
    /// uses O(1) stack and never starves sibling tasks.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::{Action, console};
    ///
    /// let echo = console::read_line().flat_map(console::write_line).forever();
    /// echo.run().await;
    /// ```
    #[must_use]
    pub fn forever(self) -> Self {
        Self::new(move || {
            let this = self.clone();
            async move {
                loop {
                    this.run().await?;
                    tokio::task::yield_now().await;
                }
            }
        })
    }

    /// Runs the action `count` times in sequence and collects the results.
    ///
    /// `replicate(0)` succeeds with an empty vector without executing the
    /// effect. The first failure short-circuits the remaining repetitions.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let results = Action::pure(7).replicate(3).run().await.unwrap();
    /// assert_eq!(results, vec![7, 7, 7]);
    /// ```
    #[must_use]
    pub fn replicate(self, count: usize) -> Action<Vec<A>> {
        Action::new(move || {
            let this = self.clone();
            async move {
                let mut results = Vec::with_capacity(count);
                for _ in 0..count {
                    results.push(this.run().await?);
                }
                Ok(results)
            }
        })
    }

    /// Defers running the action until the given duration has elapsed.
    ///
    /// Succeeds with the action's own result.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    /// use std::time::Duration;
    ///
    /// let action = Action::pure(42).delayed(Duration::from_millis(100));
    /// assert_eq!(action.run().await.unwrap(), 42);
    /// ```
    #[must_use]
    pub fn delayed(self, duration: Duration) -> Self {
        Action::delay(duration).then(self)
    }
}

// =============================================================================
// Retry Operations
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Re-runs the action on failure, up to `max_attempts` executions.
    ///
    /// Succeeds with the first successful outcome; if every attempt fails,
    /// the last failure is returned. `max_attempts` of 0 still executes
    /// once.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::file;
    ///
    /// let contents = file::read_file("flaky-mount/data.txt").retry(3);
    /// ```
    #[must_use]
    pub fn retry(self, max_attempts: usize) -> Self {
        let attempts = max_attempts.max(1);
        Self::new(move || {
            let this = self.clone();
            async move {
                let mut last_error = None;
                for _ in 0..attempts {
                    match this.run().await {
                        Ok(value) => return Ok(value),
                        Err(error) => last_error = Some(error),
                    }
                }
                Err(last_error.unwrap_or_else(|| Failure::message("retry: no attempt was made")))
            }
        })
    }

    /// Re-runs the action on failure with exponential backoff.
    ///
    /// Before each retry (attempts `2..=max_attempts`), the delay is
    /// `initial_delay * 2^(attempt - 1)` counted from the first retry: the
    /// first attempt runs immediately, the second after `initial_delay`,
    /// the third after twice that, and so on.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    /// use std::time::Duration;
    ///
    /// let result = flaky.retry_with_backoff(3, Duration::from_millis(100));
    /// // Delays: 100ms before the 2nd attempt, 200ms before the 3rd
    /// ```
    #[must_use]
    pub fn retry_with_backoff(self, max_attempts: usize, initial_delay: Duration) -> Self {
        let attempts = max_attempts.max(1);
        Self::new(move || {
            let this = self.clone();
            async move {
                let mut last_error = None;
                for attempt in 0..attempts {
                    if attempt > 0 {
                        let exponent =
                            u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                        let multiplier = 2_u32.saturating_pow(exponent);
                        tokio::time::sleep(initial_delay.saturating_mul(multiplier)).await;
                    }
                    match this.run().await {
                        Ok(value) => return Ok(value),
                        Err(error) => last_error = Some(error),
                    }
                }
                Err(last_error.unwrap_or_else(|| Failure::message("retry: no attempt was made")))
            }
        })
    }
}

// =============================================================================
// Resource Management
// =============================================================================

impl<A: Send + 'static> Action<A> {
    /// Safely acquires, uses, and releases a resource.
    ///
    /// This is the bracket pattern: `release` runs on every exit path of
    /// `use_resource` — success, failure, or panic (panics are folded into
    /// the failure channel by [`run`](Action::run)). A failure of the use
    /// step takes precedence over a failure of the release step.
    ///
    /// # Arguments
    ///
    /// * `acquire` - Produces the action that acquires the resource.
    /// * `use_resource` - Produces the action that uses the resource.
    /// * `release` - Produces the action that releases the resource.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let result = Action::bracket(
    ///     || Action::pure(42),            // acquire
    ///     |r| Action::pure(r * 2),        // use
    ///     |_| Action::pure(()),           // release
    /// );
    /// assert_eq!(result.run().await.unwrap(), 84);
    /// ```
    pub fn bracket<Resource, Acquire, Use, Release>(
        acquire: Acquire,
        use_resource: Use,
        release: Release,
    ) -> Self
    where
        Acquire: Fn() -> Action<Resource> + Send + Sync + 'static,
        Use: Fn(Resource) -> Self + Send + Sync + 'static,
        Release: Fn(Resource) -> Action<()> + Send + Sync + 'static,
        Resource: Clone + Send + 'static,
    {
        let acquire = Arc::new(acquire);
        let use_resource = Arc::new(use_resource);
        let release = Arc::new(release);
        Self::new(move || {
            let acquire = Arc::clone(&acquire);
            let use_resource = Arc::clone(&use_resource);
            let release = Arc::clone(&release);
            async move {
                let resource = acquire().run().await?;
                let outcome = use_resource(resource.clone()).run().await;
                let released = release(resource).run().await;
                match (outcome, released) {
                    (Ok(value), Ok(())) => Ok(value),
                    (Err(error), _) => Err(error),
                    (Ok(_), Err(release_error)) => Err(release_error),
                }
            }
        })
    }

    /// Ensures a cleanup action always runs after this one.
    ///
    /// The cleanup runs on success, failure, and panic. The primary
    /// outcome wins; a cleanup failure surfaces only when the primary
    /// action succeeded.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::{Action, console};
    ///
    /// let operation = risky.finally(console::write_line("cleaning up"));
    /// ```
    #[must_use]
    pub fn finally(self, cleanup: Action<()>) -> Self {
        Self::new(move || {
            let this = self.clone();
            let cleanup = cleanup.clone();
            async move {
                let outcome = this.run().await;
                let cleaned = cleanup.run().await;
                match (outcome, cleaned) {
                    (Ok(value), Ok(())) => Ok(value),
                    (Err(error), _) => Err(error),
                    (Ok(_), Err(cleanup_error)) => Err(cleanup_error),
                }
            }
        })
    }
}

// =============================================================================
// Conditional Execution
// =============================================================================

impl Action<()> {
    /// Conditional failure of an action chain.
    ///
    /// Succeeds trivially when `condition` is true; otherwise fails with
    /// [`GuardError`]. Used to abort a chain from within a sequence of
    /// binds.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    ///
    /// let action = Action::pure(5)
    ///     .flat_map(|x| Action::guard(x > 10).then(Action::pure(x)));
    /// assert!(action.run().await.is_err());
    /// ```
    #[must_use]
    pub fn guard(condition: bool) -> Self {
        if condition {
            Self::pure(())
        } else {
            Self::fail(Failure::new(GuardError))
        }
    }

    /// Runs the action only when `condition` is true.
    ///
    /// When false, this is a no-op success.
    #[must_use]
    pub fn when(self, condition: bool) -> Self {
        if condition { self } else { Self::pure(()) }
    }

    /// The reverse of [`when`](Action::when): runs the action only when
    /// `condition` is false.
    #[must_use]
    pub fn unless(self, condition: bool) -> Self {
        if condition { Self::pure(()) } else { self }
    }

    /// Creates an action that suspends for at least the given duration.
    ///
    /// Performs no other effect, and the delay does not begin until the
    /// action is run.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use deferio::effect::Action;
    /// use std::time::Duration;
    ///
    /// let action = Action::delay(Duration::from_millis(100));
    /// action.run().await.unwrap(); // waits for 100ms
    /// ```
    #[must_use]
    pub fn delay(duration: Duration) -> Self {
        Self::new(move || async move {
            tokio::time::sleep(duration).await;
            Ok(())
        })
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<A> fmt::Display for Action<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<Action>")
    }
}
