// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced by backend implementations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure surfaced by a backend operation or its pending future.
///
/// The proxy never inspects or rewraps these; whatever a backend fails with
/// is exactly what the caller's future resolves to.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filesystem failure in the local backend
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend-defined failure, kept intact so callers can downcast it.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackendError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackendError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap any error type a third-party backend wants to report.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BackendError::Other(anyhow::Error::new(error))
    }

    /// Borrow the backend-defined error, if this is one of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        match self {
            BackendError::Other(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
