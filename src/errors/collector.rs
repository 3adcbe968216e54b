// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised synchronously by the registry and the validating proxy.

use thiserror::Error;

use super::{BackendError, ConfigError};

/// Errors a caller can observe from the collector API.
///
/// Registry and validation failures are returned from the call itself, before
/// any [`PushFuture`](crate::proxy::PushFuture) exists. Failures originating
/// in a backend only ever arrive through the future as a [`BackendError`];
/// the `Backend` variant exists so callers can `?` both into one type.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// No backend is registered under the requested name.
    #[error("No registered pushcollector backend: '{0}'")]
    UnknownBackend(String),

    /// An argument can never be valid, regardless of backend.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A canonical record failed schema validation. The whole batch is rejected.
    #[error("push item {index} failed validation at '{field}': {reason}")]
    SchemaViolation {
        /// Position of the offending record in the expanded batch
        index: usize,
        /// JSON-pointer-like path of the offending field
        field: String,
        reason: String,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Lets infallible conversions into `PushItemInput` share a bound with fallible ones.
impl From<std::convert::Infallible> for CollectorError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
