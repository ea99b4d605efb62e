//! Error types for pipe execution and value coercion.
//!
//! Step errors are never wrapped by the engine: whatever a step returns as
//! `Err(e)` is handed to its recovery function, or out of `exec`, unchanged.
//! `CoerceError` only appears at the explicit accessor boundary.

use std::sync::Arc;
use thiserror::Error;

/// Default step error type: a shareable, thread-safe error object.
///
/// It is an `Arc` rather than a `Box` because pending results are shared
/// futures and their output must be `Clone`.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Wraps any error into a [`BoxError`].
#[inline]
pub fn boxed<E>(err: E) -> BoxError
where
    E: std::error::Error + Send + Sync + 'static,
{
    Arc::new(err)
}

/// Failure returned by the coercion accessors such as `Pipe::exec_number`.
#[derive(Debug, Error)]
pub enum CoerceError<E> {
    /// A step failed without recovery; carries the step's own error.
    #[error("pipe step failed: {0}")]
    Step(E),

    /// The pipe resolved to a pending future, which has no plain value yet.
    #[error("pipe value is still pending; await it instead")]
    Pending,

    /// The rendered value could not be parsed as the requested number type.
    #[error("`{input}` is not a number")]
    NotNumeric {
        /// The rendered value that failed to parse
        input: String,
    },

    /// Serializing the value to JSON failed.
    #[cfg(feature = "serde")]
    #[error("failed to serialize pipe value: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> CoerceError<E> {
    /// Returns the step error, if this failure came from a step.
    pub fn into_step(self) -> Option<E> {
        match self {
            CoerceError::Step(err) => Some(err),
            _ => None,
        }
    }
}
