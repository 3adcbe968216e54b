// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable
//! output, and [`StructuredLog`] to emit itself with structured fields at its
//! documented level.
//!
//! # Usage Pattern
//!
//! ```rust
//! use push_collector::observability::messages::registry::BackendResolved;
//! use push_collector::observability::messages::StructuredLog;
//!
//! let msg = BackendResolved {
//!     name: "local",
//!     is_default: true,
//! };
//!
//! let span = msg.span("get_collector");
//! let _guard = span.enter();
//! msg.log();
//! ```

use tracing::Span;

pub mod local;
pub mod proxy;
pub mod registry;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit this message as a tracing event.
    fn log(&self);

    /// Build a span carrying this message's fields.
    fn span(&self, name: &str) -> Span;
}
