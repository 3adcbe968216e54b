// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output of the collector goes through `tracing`. Rather than
//! formatting strings at each call site, every event is a small message struct
//! implementing `Display` (human-readable text) and [`StructuredLog`]
//! (structured fields and a matching span).
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::local` - local filesystem backend: run directories, files
//! * `messages::proxy` - validation and forwarding in the collector proxy
//! * `messages::registry` - backend registration and resolution
//!
//! # Usage
//!
//! ```rust
//! use push_collector::observability::messages::{local::LoggingToFile, StructuredLog};
//! use std::path::Path;
//!
//! let msg = LoggingToFile {
//!     path: Path::new("artifacts/20250101120000/pushitems.jsonl"),
//! };
//!
//! msg.log();
//! ```
//!
//! The library never installs a subscriber; that is left to the application.

pub mod messages;
