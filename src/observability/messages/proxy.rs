// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the validating proxy.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A validated batch is being handed to the backend.
///
/// # Log Level
/// `debug!` - Per-call detail
pub struct PushItemsForwarded<'a> {
    pub backend: &'a str,
    /// Number of caller-supplied items
    pub input_count: usize,
    /// Number of canonical records after destination fan-out
    pub record_count: usize,
}

impl Display for PushItemsForwarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Forwarding {} push item records ({} inputs) to backend '{}'",
            self.record_count, self.input_count, self.backend
        )
    }
}

impl StructuredLog for PushItemsForwarded<'_> {
    fn log(&self) {
        tracing::debug!(
            backend = self.backend,
            input_count = self.input_count,
            record_count = self.record_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "update_push_items",
            span_name = name,
            backend = self.backend,
            record_count = self.record_count,
        )
    }
}

/// A batch was rejected by schema validation.
///
/// # Log Level
/// `warn!` - Caller error, nothing was forwarded
pub struct PushItemRejected<'a> {
    pub backend: &'a str,
    pub index: usize,
    pub field: &'a str,
    pub reason: &'a str,
}

impl Display for PushItemRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected push item batch for backend '{}': item {} invalid at '{}': {}",
            self.backend, self.index, self.field, self.reason
        )
    }
}

impl StructuredLog for PushItemRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            backend = self.backend,
            index = self.index,
            field = self.field,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "update_push_items",
            span_name = name,
            backend = self.backend,
            index = self.index,
        )
    }
}

/// File content is being handed to the backend.
///
/// # Log Level
/// `trace!` - High-volume detail
pub struct FileForwarded<'a> {
    pub backend: &'a str,
    pub filename: &'a str,
    pub size: usize,
    pub append: bool,
}

impl Display for FileForwarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let verb = if self.append { "Appending" } else { "Attaching" };
        write!(
            f,
            "{} {} bytes to '{}' via backend '{}'",
            verb, self.size, self.filename, self.backend
        )
    }
}

impl StructuredLog for FileForwarded<'_> {
    fn log(&self) {
        tracing::trace!(
            backend = self.backend,
            filename = self.filename,
            size = self.size,
            append = self.append,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "collect_file",
            span_name = name,
            backend = self.backend,
            filename = self.filename,
        )
    }
}
