// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod registry;

pub mod consts;

pub use loader::{load_config, CollectorConfig, LocalConfig};
pub use registry::{BackendFactory, Registry};
