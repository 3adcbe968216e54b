// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // storage backends
pub mod config;        // config + backend registry
pub mod errors;        // error handling
pub mod items;         // push item representations
pub mod observability;
pub mod proxy;         // validating proxy handed to callers
pub mod schema;        // push item schema
pub mod traits;        // backend abstraction

pub use config::{load_config, CollectorConfig, Registry};
pub use errors::{BackendError, CollectorError};
pub use items::{PushItemInput, PushItemRecord, RichPushItem};
pub use proxy::{CollectorProxy, FileContent, PushFuture};
pub use traits::{BackendResult, Collector, Completion};
