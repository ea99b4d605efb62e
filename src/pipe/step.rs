//! Queued step records and how each one is applied to the running value.

use super::flow::Flow;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;

/// Recovery attached to a step by `catch` or `catch_async`.
pub(crate) enum Recover<T, E> {
    Sync(Box<dyn FnOnce(E) -> T + Send>),
    Async(Box<dyn FnOnce(E) -> BoxFuture<'static, T> + Send>),
}

impl<T, E> Recover<T, E> {
    pub(crate) fn sync<F>(f: F) -> Self
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        Recover::Sync(Box::new(f))
    }

    pub(crate) fn future<F, Fut>(f: F) -> Self
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Recover::Async(Box::new(move |err| f(err).boxed()))
    }

    async fn run(self, err: E) -> T {
        match self {
            Recover::Sync(f) => f(err),
            Recover::Async(f) => f(err).await,
        }
    }
}

impl<T, E> Recover<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Ready for sync recovery, pending on the recovery future otherwise.
    fn into_flow(self, err: E) -> Flow<T, E> {
        match self {
            Recover::Sync(f) => Flow::Ready(f(err)),
            Recover::Async(f) => {
                let future = f(err);
                Flow::pending(async move { Ok::<T, E>(future.await) })
            }
        }
    }
}

/// A type-erased step body producing `O`.
pub(crate) enum Transform<T, E, O> {
    /// Runs during `exec` against the plain value, or later inside the
    /// pending chain if the value is not ready yet.
    Sync(Box<dyn FnOnce(&T) -> Result<O, E> + Send>),
    /// Receives the raw current flow and returns a future.
    Async(Box<dyn FnOnce(Flow<T, E>) -> BoxFuture<'static, Result<O, E>> + Send>),
}

impl<T, E, O> Transform<T, E, O> {
    pub(crate) fn sync<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> Result<O, E> + Send + 'static,
    {
        Transform::Sync(Box::new(f))
    }

    pub(crate) fn future<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Flow<T, E>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        Transform::Async(Box::new(move |flow| f(flow).boxed()))
    }
}

pub(crate) enum StepKind<T, E> {
    /// Replaces the running value.
    Map(Transform<T, E, T>),
    /// Side effect only.
    Tap(Transform<T, E, ()>),
}

impl<T, E> StepKind<T, E> {
    fn label(&self) -> &'static str {
        match self {
            StepKind::Map(Transform::Sync(_)) => "to",
            StepKind::Map(Transform::Async(_)) => "to_async",
            StepKind::Tap(Transform::Sync(_)) => "tap",
            StepKind::Tap(Transform::Async(_)) => "tap_async",
        }
    }
}

pub(crate) struct StepRecord<T, E> {
    pub(crate) kind: StepKind<T, E>,
    pub(crate) recover: Option<Recover<T, E>>,
}

impl<T, E> StepRecord<T, E> {
    pub(crate) fn new(kind: StepKind<T, E>) -> Self {
        Self {
            kind,
            recover: None,
        }
    }
}

impl<T, E> fmt::Debug for StepRecord<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRecord")
            .field("kind", &self.kind.label())
            .field("recover", &self.recover.is_some())
            .finish()
    }
}

impl<T, E> StepRecord<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Applies this record to `current`.
    ///
    /// `Err` means a synchronous failure with no recovery attached; `current`
    /// is left as it was before the step.
    pub(crate) fn apply(self, current: &mut Flow<T, E>) -> Result<(), E> {
        let label = self.kind.label();
        tracing::trace!(step = label, pending = current.is_pending(), "applying pipe step");

        let StepRecord { kind, recover } = self;
        let next = match kind {
            StepKind::Map(Transform::Sync(f)) => match &*current {
                Flow::Ready(value) => match f(value) {
                    Ok(value) => Flow::Ready(value),
                    Err(err) => recover_now(recover, err)?,
                },
                Flow::Pending(prev) => {
                    let prev = prev.clone();
                    Flow::pending(async move {
                        let value = prev.await?;
                        match f(&value) {
                            Ok(value) => Ok(value),
                            Err(err) => recover_or(recover, err).await,
                        }
                    })
                }
            },
            StepKind::Map(Transform::Async(f)) => {
                let future = f(current.clone());
                Flow::pending(async move {
                    match future.await {
                        Ok(value) => Ok(value),
                        Err(err) => recover_or(recover, err).await,
                    }
                })
            }
            StepKind::Tap(Transform::Sync(f)) => match &*current {
                Flow::Ready(value) => match f(value) {
                    Ok(()) => return Ok(()),
                    // taps keep the running value, so a recovered value is dropped
                    Err(err) => match recover_now(recover, err)? {
                        Flow::Ready(_) => return Ok(()),
                        Flow::Pending(recovered) => {
                            let value = value.clone();
                            Flow::pending(async move {
                                recovered.await?;
                                Ok::<T, E>(value)
                            })
                        }
                    },
                },
                Flow::Pending(prev) => {
                    let prev = prev.clone();
                    Flow::pending(async move {
                        let value = prev.await?;
                        if let Err(err) = f(&value) {
                            recover_or(recover, err).await?;
                        }
                        Ok::<T, E>(value)
                    })
                }
            },
            StepKind::Tap(Transform::Async(f)) => {
                let future = f(current.clone());
                let prev = current.clone();
                Flow::pending(async move {
                    if let Err(err) = future.await {
                        match recover {
                            Some(recover) => {
                                tracing::debug!("async tap failed; recovered");
                                let _ = recover.run(err).await;
                            }
                            None => tracing::warn!("async tap failed; value passed on unchanged"),
                        }
                    }
                    prev.await
                })
            }
        };
        *current = next;
        Ok(())
    }
}

fn recover_now<T, E>(recover: Option<Recover<T, E>>, err: E) -> Result<Flow<T, E>, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    match recover {
        Some(recover) => {
            tracing::debug!("pipe step failed; recovered");
            Ok(recover.into_flow(err))
        }
        None => {
            tracing::debug!("pipe step failed without recovery");
            Err(err)
        }
    }
}

async fn recover_or<T, E>(recover: Option<Recover<T, E>>, err: E) -> Result<T, E> {
    match recover {
        Some(recover) => {
            tracing::debug!("pipe step failed; recovered");
            Ok(recover.run(err).await)
        }
        None => {
            tracing::debug!("pipe step failed without recovery");
            Err(err)
        }
    }
}
