//! # deferio
//!
//! A deferred-execution effect library for Rust.
//!
//! ## Overview
//!
//! This library provides [`Action<A>`](effect::Action): a plain value that
//! *describes* a side-effecting asynchronous computation without performing
//! it. Building and combining actions never performs work; only awaiting
//! [`run`](effect::Action::run) does, and running the same action twice
//! re-performs its effect independently. It includes:
//!
//! - **The action core**: construction, execution, and the monadic operator
//!   set (`fmap`, `apply`, `flat_map`, `then`, `left`, `catch`)
//! - **Concurrency combinators**: `all`, `sequence`, `forever`, `replicate`
//! - **Conditional and recovery combinators**: `guard`, `when`, `unless`,
//!   `retry`, `bracket`, `finally`
//! - **Effect primitives**: console read/write (including raw-mode character
//!   input) and UTF-8 file read/write/append
//!
//! ## Example
//!
//! ```rust
//! use deferio::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Describing a computation performs no work.
//! let action = Action::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| Action::pure(x + 1));
//!
//! // Work happens only when the action is run.
//! assert_eq!(action.run().await.unwrap(), 21);
//!
//! // Actions are values: the same action can be run again.
//! assert_eq!(action.run().await.unwrap(), 21);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and the effect-primitive modules.
///
/// # Usage
///
/// ```rust
/// use deferio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::effect::*;
}

pub mod effect;
