// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the local filesystem backend.
//!
//! This module contains message types for logging events related to:
//! * Run directory creation
//! * Maintenance of the `latest` pointer
//! * Files being created inside a run directory

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A file is about to be created in the run directory.
///
/// Emitted once per distinct file per backend instance.
///
/// # Log Level
/// `info!` - Important operational event
pub struct LoggingToFile<'a> {
    pub path: &'a Path,
}

impl Display for LoggingToFile<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Logging to {}", self.path.display())
    }
}

impl StructuredLog for LoggingToFile<'_> {
    fn log(&self) {
        tracing::info!(path = %self.path.display(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("local_file", span_name = name, path = %self.path.display())
    }
}

/// A new run directory was created.
///
/// # Log Level
/// `debug!` - Internal state transition
pub struct RunDirectoryCreated<'a> {
    pub path: &'a Path,
    /// Collision suffix appended to the timestamp, zero if none was needed
    pub suffix: u32,
}

impl Display for RunDirectoryCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created run directory {}", self.path.display())
    }
}

impl StructuredLog for RunDirectoryCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            path = %self.path.display(),
            suffix = self.suffix,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "run_directory",
            span_name = name,
            path = %self.path.display(),
            suffix = self.suffix,
        )
    }
}

/// The `latest` pointer now targets a new run directory.
///
/// # Log Level
/// `debug!` - Internal state transition
pub struct LatestPointerUpdated<'a> {
    pub link: &'a Path,
    pub target: &'a str,
    /// Whether a previous pointer had to be removed first
    pub replaced: bool,
}

impl Display for LatestPointerUpdated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pointed {} at {}", self.link.display(), self.target)
    }
}

impl StructuredLog for LatestPointerUpdated<'_> {
    fn log(&self) {
        tracing::debug!(
            link = %self.link.display(),
            target = self.target,
            replaced = self.replaced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "latest_pointer",
            span_name = name,
            link = %self.link.display(),
            target = self.target,
        )
    }
}
