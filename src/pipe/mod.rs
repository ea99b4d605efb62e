//! Lazy, chainable value pipelines.
//!
//! A [`Pipe`] holds one value and a queue of steps. Chaining calls only record
//! steps; [`Pipe::exec`] replays everything queued so far, in order, and keeps
//! the result as the new value. Steps attached after an `exec` run on the next
//! one, on top of the value the previous run left behind.
//!
//! Step shapes:
//! - `to` / `to_with` / `try_to`: synchronous, replace the value
//! - `to_async`: receives the raw [`Flow`] and returns a future
//! - `tap` / `tap_with` / `try_tap` / `tap_async`: same shapes, value untouched
//! - `catch` / `catch_async`: recovery for the most recently queued step
//!
//! Once an async step runs the value becomes [`Flow::Pending`]. Later
//! synchronous steps are chained onto that future and run when it resolves;
//! later async steps receive the pending flow as-is and await it themselves.

mod coerce;
mod flow;
mod step;

pub use flow::{Flow, SharedFuture};

use crate::collections::FifoQueue;
use crate::error::BoxError;
use std::fmt;
use std::future::Future;
use step::{Recover, StepKind, StepRecord, Transform};

/// Whether a pipe has work queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeState {
    /// Steps are queued and will run on the next `exec`.
    Building,
    /// Nothing queued; the current value is final until more steps are attached.
    Idle,
}

/// A value plus a queue of deferred steps.
///
/// `E` is the error type steps may fail with. It is passed through untouched:
/// recovery functions and callers of `exec` see exactly what the step returned.
///
/// ### Examples
/// ```rust
/// use pipe_sugars::Pipe;
///
/// let mut pipe = Pipe::new(5);
/// pipe.to(|x| x * 2).tap(|x| println!("doubled: {x}"));
/// assert_eq!(pipe.exec().ok().and_then(|flow| flow.into_ready()), Some(10));
///
/// pipe.to(|x| x - 1);
/// assert_eq!(pipe.exec().ok().and_then(|flow| flow.into_ready()), Some(9));
/// ```
pub struct Pipe<T, E = BoxError> {
    value: Flow<T, E>,
    steps: FifoQueue<StepRecord<T, E>>,
}

impl<T> Pipe<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a pipe over `value` using [`BoxError`] for step failures.
    #[inline]
    pub fn new(value: T) -> Self {
        Self::from_value(value)
    }
}

impl<T, E> Pipe<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a pipe over `value` with a caller-chosen error type.
    #[inline]
    pub fn from_value(value: T) -> Self {
        Self::from_flow(Flow::Ready(value))
    }

    /// Creates a pipe whose starting value is still being computed.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_flow(Flow::pending(future))
    }

    /// Creates a pipe over an existing flow.
    pub fn from_flow(value: Flow<T, E>) -> Self {
        Self {
            value,
            steps: FifoQueue::new(),
        }
    }

    /// Queues a step that replaces the value with `f(&value)`.
    pub fn to<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.push(StepKind::Map(Transform::sync(move |value| Ok(f(value)))))
    }

    /// Like [`Pipe::to`], passing `args` after the value.
    ///
    /// ```rust
    /// use pipe_sugars::Pipe;
    ///
    /// let mut pipe = Pipe::new(2);
    /// pipe.to_with(|x, (a, b)| x * a + b, (10, 1));
    /// assert_eq!(pipe.exec().ok().and_then(|flow| flow.into_ready()), Some(21));
    /// ```
    pub fn to_with<A, F>(&mut self, f: F, args: A) -> &mut Self
    where
        A: Send + 'static,
        F: FnOnce(&T, &A) -> T + Send + 'static,
    {
        self.to(move |value| f(value, &args))
    }

    /// Queues a step that may fail. Without a `catch`, a failure stops `exec`.
    pub fn try_to<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&T) -> Result<T, E> + Send + 'static,
    {
        self.push(StepKind::Map(Transform::sync(f)))
    }

    /// Queues an async step. It receives the current flow, ready or not, and
    /// the value becomes pending on its future.
    pub fn to_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(Flow<T, E>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.push(StepKind::Map(Transform::future(f)))
    }

    /// Queues a side effect on the value. The return value is ignored.
    pub fn tap<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.push(StepKind::Tap(Transform::sync(move |value| {
            f(value);
            Ok(())
        })))
    }

    /// Like [`Pipe::tap`], passing `args` after the value.
    pub fn tap_with<A, F>(&mut self, f: F, args: A) -> &mut Self
    where
        A: Send + 'static,
        F: FnOnce(&T, &A) + Send + 'static,
    {
        self.tap(move |value| f(value, &args))
    }

    /// Queues a side effect that may fail.
    pub fn try_tap<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&T) -> Result<(), E> + Send + 'static,
    {
        self.push(StepKind::Tap(Transform::sync(f)))
    }

    /// Queues an async side effect. Its future is awaited in order before
    /// the unchanged value is passed on.
    ///
    /// A failed tap never changes the value: without a `catch` the error is
    /// logged at `warn` and the chain continues.
    pub fn tap_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(Flow<T, E>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        self.push(StepKind::Tap(Transform::future(f)))
    }

    /// Attaches recovery to the most recently queued step, replacing any
    /// recovery it already had.
    ///
    /// With nothing queued (a fresh pipe, or right after `exec`) this is a
    /// no-op: there is no step to attach to.
    pub fn catch<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        self.recover_with(Recover::sync(f))
    }

    /// Like [`Pipe::catch`], with recovery that returns a future.
    ///
    /// A synchronous step recovered this way leaves the value pending.
    ///
    /// ```rust
    /// use pipe_sugars::Pipe;
    ///
    /// # tokio_test::block_on(async {
    /// let mut pipe = Pipe::<i32, String>::from_value(5);
    /// pipe.to_async(|_| async { Err("unavailable".to_string()) })
    ///     .catch_async(|_| async { 70 })
    ///     .to(|x| x - 1);
    /// assert_eq!(pipe.run().await, Ok(69));
    /// # });
    /// ```
    pub fn catch_async<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.recover_with(Recover::future(f))
    }

    /// Runs every queued step in order and returns the resulting value.
    ///
    /// Each step runs at most once: it is dequeued as it runs. On an
    /// unrecovered synchronous failure the error is returned, the value stays
    /// what it was before the failing step, and the steps after it remain
    /// queued for the next call.
    pub fn exec(&mut self) -> Result<Flow<T, E>, E> {
        if !self.steps.is_empty() {
            tracing::trace!(queued = self.steps.len(), "draining pipe");
        }
        for step in self.steps.drain() {
            step.apply(&mut self.value)?;
        }
        Ok(self.value.clone())
    }

    /// Runs [`Pipe::exec`] and awaits the result.
    ///
    /// ```rust
    /// use pipe_sugars::Pipe;
    ///
    /// # tokio_test::block_on(async {
    /// let mut pipe = Pipe::<i32, String>::from_future(async { Ok(0) });
    /// pipe.to_async(|x| async move { Ok(x.await? + 1) })
    ///     .to(|x| x * 10);
    /// assert_eq!(pipe.run().await, Ok(10));
    /// # });
    /// ```
    pub async fn run(&mut self) -> Result<T, E> {
        self.exec()?.await
    }

    /// The current value, without running anything.
    #[inline]
    pub fn current(&self) -> &Flow<T, E> {
        &self.value
    }

    /// Number of steps waiting for the next `exec`.
    #[inline]
    pub fn queued(&self) -> usize {
        self.steps.len()
    }

    /// Returns [`PipeState::Building`] while steps are queued.
    pub fn state(&self) -> PipeState {
        if self.steps.is_empty() {
            PipeState::Idle
        } else {
            PipeState::Building
        }
    }

    fn recover_with(&mut self, recover: Recover<T, E>) -> &mut Self {
        match self.steps.peek_back_mut() {
            Some(step) => step.recover = Some(recover),
            None => tracing::warn!("catch called with no queued step; ignoring"),
        }
        self
    }

    fn push(&mut self, kind: StepKind<T, E>) -> &mut Self {
        self.steps.enqueue(StepRecord::new(kind));
        self
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Pipe<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("value", &self.value)
            .field("queued", &self.steps.len())
            .finish()
    }
}
