//! # Pipe Sugars
//!
//! Lazy, chainable value pipelines: attach steps to a value, then run them
//! all at once with `exec`.
//!
//! - **Deferred**: `to`, `tap` and `catch` only record steps.
//! - **Ordered**: steps run strictly in the order they were attached, one at a time.
//! - **Repeatable**: `exec` drains the queue, so running again is a no-op until
//!   more steps are attached; new steps build on the last result.
//! - **Sync or async**: async steps turn the value into a pending [`Flow`] that
//!   later steps keep chaining onto.
//! - **Local recovery**: `catch` handles a failure of the step right before it
//!   without aborting the rest of the chain.
//!
//! ## Features
//!
//! - `macros` - The `pipe!` macro (enabled by default)
//! - `serde` - JSON accessors `exec_json` and `exec_json_value`
//!
//! ## Example
//!
//! ```rust
//! use pipe_sugars::Pipe;
//!
//! let mut pipe = Pipe::<i32, String>::from_value(5);
//! pipe.to(|x| x * 2)
//!     .try_to(|_| Err("simulated error".to_string()))
//!     .catch(|_| 1);
//! assert_eq!(pipe.exec_ready().ok(), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod collections;
pub mod error;
pub mod pipe;

#[cfg(feature = "macros")]
pub mod macros;

pub use collections::FifoQueue;
pub use error::{boxed, BoxError, CoerceError};
pub use pipe::{Flow, Pipe, PipeState, SharedFuture};
