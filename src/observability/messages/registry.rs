// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for backend registration and resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A backend factory was registered (or replaced).
///
/// # Log Level
/// `debug!` - Configuration detail
pub struct BackendRegistered<'a> {
    pub name: &'a str,
    pub replaced: bool,
}

impl Display for BackendRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(f, "Replaced pushcollector backend '{}'", self.name)
        } else {
            write!(f, "Registered pushcollector backend '{}'", self.name)
        }
    }
}

impl StructuredLog for BackendRegistered<'_> {
    fn log(&self) {
        tracing::debug!(backend = self.name, replaced = self.replaced, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("registry", span_name = name, backend = self.name)
    }
}

/// A backend was removed from the registry.
///
/// # Log Level
/// `debug!` - Configuration detail
pub struct BackendUnregistered<'a> {
    pub name: &'a str,
    /// Whether removing it forced the default back to the initial backend
    pub reset_default: bool,
}

impl Display for BackendUnregistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unregistered pushcollector backend '{}'", self.name)
    }
}

impl StructuredLog for BackendUnregistered<'_> {
    fn log(&self) {
        tracing::debug!(
            backend = self.name,
            reset_default = self.reset_default,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("registry", span_name = name, backend = self.name)
    }
}

/// The default backend changed.
///
/// # Log Level
/// `info!` - Affects where all subsequent data goes
pub struct DefaultBackendChanged<'a> {
    pub previous: &'a str,
    pub current: &'a str,
}

impl Display for DefaultBackendChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Default pushcollector backend changed from '{}' to '{}'",
            self.previous, self.current
        )
    }
}

impl StructuredLog for DefaultBackendChanged<'_> {
    fn log(&self) {
        tracing::info!(
            previous = self.previous,
            current = self.current,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registry",
            span_name = name,
            previous = self.previous,
            current = self.current,
        )
    }
}

/// A collector instance was created for a backend.
///
/// # Log Level
/// `debug!` - Per-call detail
pub struct BackendResolved<'a> {
    pub name: &'a str,
    pub is_default: bool,
}

impl Display for BackendResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created collector for backend '{}'", self.name)
    }
}

impl StructuredLog for BackendResolved<'_> {
    fn log(&self) {
        tracing::debug!(backend = self.name, is_default = self.is_default, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "registry",
            span_name = name,
            backend = self.name,
            is_default = self.is_default,
        )
    }
}
