use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

use crate::errors::BackendError;
use crate::items::PushItemRecord;

/// How a backend reports the outcome of an operation.
///
/// `Ok(Completion::Done)` is a plain, already-finished result; `Pending`
/// hands back work still in flight; `Err` is the backend failing on the spot.
/// The proxy folds all three into a single [`PushFuture`](crate::proxy::PushFuture).
pub type BackendResult = Result<Completion, BackendError>;

pub enum Completion {
    Done,
    Pending(BoxFuture<'static, Result<(), BackendError>>),
}

impl Completion {
    /// Wrap a backend future, discarding whatever value it succeeds with.
    pub fn pending<F, T, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: 'static,
        E: Into<BackendError> + 'static,
    {
        Completion::Pending(future.map(|result| result.map(|_| ()).map_err(Into::into)).boxed())
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completion::Done => f.write_str("Done"),
            Completion::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Storage backend for push item data and artifact files.
///
/// Backends only ever see validated canonical records and raw bytes; input
/// normalization happens in the proxy that wraps every instance.
pub trait Collector: Send {
    /// Record a state change on one or more push items.
    fn update_push_items(&mut self, items: &[PushItemRecord]) -> BackendResult;

    /// Write `content` into `filename`, replacing any previous content.
    fn attach_file(&mut self, filename: &str, content: &[u8]) -> BackendResult;

    /// Like [`attach_file`](Collector::attach_file), but appends to an existing file.
    fn append_file(&mut self, filename: &str, content: &[u8]) -> BackendResult;
}
