//! Deferred effect handling.
//!
//! This module provides the [`Action`] type and the combinators and effect
//! primitives built around it.
//!
//! # Action Monad
//!
//! The [`Action`] type represents a computation that may perform side
//! effects. Side effects are deferred until [`Action::run`] is awaited,
//! maintaining referential transparency in pure code. Unlike a bare future,
//! an `Action` is a reusable value: every `run` call re-performs its effect.
//!
//! ```rust
//! use deferio::effect::Action;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Create and chain actions
//! let action = Action::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| Action::pure(x + 1));
//!
//! // Side effects don't occur until run is awaited
//! assert_eq!(action.run().await.unwrap(), 21);
//! # }
//! ```
//!
//! # Failure Channel
//!
//! A running action settles as `Result<A, Failure>`. [`Failure`] is an
//! opaque, cloneable error value; panics raised while an action executes
//! are folded into the same channel, so [`Action::catch`] observes every
//! way an action can fail.
//!
//! # Effect Primitives
//!
//! - [`console`]: standard output/input, including raw-mode character reads
//! - [`file`]: UTF-8 file read, overwrite, and append

// =============================================================================
// Action Core
// =============================================================================

mod action;

pub use action::Action;

// =============================================================================
// Failure Values
// =============================================================================

mod error;

pub use error::{Failure, GuardError, MessageError, PanicError};

// =============================================================================
// Effect Primitives
// =============================================================================

pub mod console;
pub mod file;
