// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt};

use crate::errors::BackendError;
use crate::traits::{BackendResult, Completion};

/// Outcome of a collector operation.
///
/// Resolves to `Ok(())` once the backend has finished, or to the exact
/// [`BackendError`] the backend failed with. Nothing is scheduled on the
/// caller's behalf: backends that did their work synchronously produce an
/// already-resolved future, and pending backend futures are polled wherever
/// the caller awaits this one.
#[must_use = "a PushFuture reports whether the backend succeeded"]
pub struct PushFuture {
    inner: BoxFuture<'static, Result<(), BackendError>>,
}

impl PushFuture {
    pub fn ready() -> Self {
        Self {
            inner: future::ready(Ok(())).boxed(),
        }
    }

    pub fn failed(error: BackendError) -> Self {
        Self {
            inner: future::ready(Err(error)).boxed(),
        }
    }

    /// Fold whatever a backend returned into a `PushFuture`.
    pub fn from_backend(result: BackendResult) -> Self {
        match result {
            Ok(Completion::Done) => Self::ready(),
            Ok(Completion::Pending(inner)) => Self { inner },
            Err(error) => Self::failed(error),
        }
    }

    /// Block the current thread until the operation completes.
    ///
    /// Must not be called from within an async runtime's worker thread.
    pub fn wait(self) -> Result<(), BackendError> {
        futures::executor::block_on(self)
    }
}

impl Future for PushFuture {
    type Output = Result<(), BackendError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.poll_unpin(cx)
    }
}

impl std::fmt::Debug for PushFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushFuture").finish_non_exhaustive()
    }
}
