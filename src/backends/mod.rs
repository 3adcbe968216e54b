// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Collector backend implementations.
//!
//! Each backend implements the [`Collector`](crate::traits::Collector) trait
//! and is made available to callers through a factory registered with the
//! [`Registry`](crate::config::Registry). Callers never use a backend
//! directly; they receive it wrapped in a
//! [`CollectorProxy`](crate::proxy::CollectorProxy).
//!
//! # Available Backends
//!
//! ## Local Backend (`local`, the default)
//! Writes push items and files under `artifacts/` in the working directory:
//! - **Run directories**: one timestamped directory per collector instance
//! - **Latest pointer**: `artifacts/latest` always names the newest run
//! - **Push items**: appended to `pushitems.jsonl`, one record per line
//!
//! ## Dummy Backend (`dummy`)
//! Accepts everything and stores nothing.
//!
//! ## Stub Backend (Test-Only)
//! `RecordingCollector` records every call and can be told how to respond
//! (plain value, pending future, failed future, synchronous failure).
//!
//! # Architecture
//!
//! ```text
//! Registry → Factory → Backend Instance → CollectorProxy → Caller
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use push_collector::config::Registry;
//! use push_collector::backends::local::LocalCollector;
//!
//! let registry = Registry::new();
//! registry.register_backend("scratch", || LocalCollector::with_root("/tmp/scratch"))?;
//!
//! let mut collector = registry.get(Some("scratch"))?;
//! collector.attach_file("build.log", "ok\n")?.wait()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dummy;
pub mod local;
#[cfg(test)]
pub mod stub;

#[cfg(test)]
mod integration_tests;
