//! The running value of a pipe: either ready now or a shared pending future.

use futures::future::{self, BoxFuture, Either, Ready, Shared};
use futures::FutureExt;
use std::fmt;
use std::future::{Future, IntoFuture};

/// A boxed future that several steps can await, each getting a clone of the output.
pub type SharedFuture<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Current value of a [`Pipe`](crate::Pipe).
///
/// A pipe starts `Ready` and stays that way until an async step runs, after
/// which it is `Pending` for the rest of that chain. Awaiting a `Flow` works
/// in both states, so an async step can always write `value.await?`.
///
/// ```rust
/// use pipe_sugars::Flow;
///
/// # tokio_test::block_on(async {
/// let ready: Flow<i32, String> = Flow::Ready(1);
/// let pending: Flow<i32, String> = Flow::pending(async { Ok(2) });
/// assert!(pending.is_pending());
/// assert_eq!(ready.await, Ok(1));
/// assert_eq!(pending.await, Ok(2));
/// # });
/// ```
pub enum Flow<T, E> {
    /// A plain value.
    Ready(T),
    /// A value still being computed.
    Pending(SharedFuture<T, E>),
}

impl<T, E> Flow<T, E> {
    /// Returns the plain value, if there is one.
    #[inline]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Flow::Ready(value) => Some(value),
            Flow::Pending(_) => None,
        }
    }

    /// Consumes the flow, returning the plain value if there is one.
    #[inline]
    pub fn into_ready(self) -> Option<T> {
        match self {
            Flow::Ready(value) => Some(value),
            Flow::Pending(_) => None,
        }
    }

    /// Returns true for `Flow::Ready`.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Flow::Ready(_))
    }

    /// Returns true for `Flow::Pending`.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Flow::Pending(_))
    }
}

impl<T, E> Flow<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wraps a future as a pending flow.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Flow::Pending(future.boxed().shared())
    }
}

impl<T: Clone, E> Clone for Flow<T, E> {
    fn clone(&self) -> Self {
        match self {
            Flow::Ready(value) => Flow::Ready(value.clone()),
            Flow::Pending(shared) => Flow::Pending(shared.clone()),
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Flow<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Flow::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl<T, E> From<T> for Flow<T, E> {
    #[inline]
    fn from(value: T) -> Self {
        Flow::Ready(value)
    }
}

impl<T, E> IntoFuture for Flow<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Result<T, E>;
    type IntoFuture = Either<Ready<Result<T, E>>, SharedFuture<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Flow::Ready(value) => Either::Left(future::ready(Ok(value))),
            Flow::Pending(shared) => Either::Right(shared),
        }
    }
}
