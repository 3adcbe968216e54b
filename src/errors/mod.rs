// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod collector;
mod config;

pub use backend::BackendError;
pub use collector::CollectorError;
pub use config::ConfigError;
