// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The validating proxy placed in front of every backend.
//!
//! Callers never hold a backend directly. [`Registry::get`](crate::config::Registry::get)
//! wraps each new instance in a [`CollectorProxy`], which is the only place
//! where:
//!
//! - rich push items are expanded into canonical records,
//! - records are validated against the push item schema,
//! - text content is encoded to bytes,
//! - backend results (plain, failed, or pending) become a [`PushFuture`].
//!
//! Backends can therefore stay minimal, and cannot widen or alter the API
//! callers observe.

mod future;

use std::sync::Arc;

pub use future::PushFuture;

use crate::errors::CollectorError;
use crate::items::{PushItemInput, PushItemRecord};
use crate::observability::messages::proxy::{FileForwarded, PushItemRejected, PushItemsForwarded};
use crate::observability::messages::StructuredLog;
use crate::schema::ItemSchema;
use crate::traits::Collector;

/// Content for `attach_file` / `append_file`.
///
/// Text is always stored as UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileContent<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> FileContent<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Bytes(bytes) => bytes,
        }
    }
}

impl<'a> From<&'a str> for FileContent<'a> {
    fn from(text: &'a str) -> Self {
        FileContent::Text(text)
    }
}

impl<'a> From<&'a String> for FileContent<'a> {
    fn from(text: &'a String) -> Self {
        FileContent::Text(text)
    }
}

impl<'a> From<&'a [u8]> for FileContent<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FileContent<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for FileContent<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        FileContent::Bytes(bytes)
    }
}

/// A collector as handed out to callers.
pub struct CollectorProxy {
    backend_name: String,
    delegate: Box<dyn Collector>,
    schema: Arc<ItemSchema>,
}

impl CollectorProxy {
    /// Wrap `delegate`, validating push items against the bundled schema.
    pub fn new(backend_name: impl Into<String>, delegate: Box<dyn Collector>) -> Self {
        Self::with_schema(backend_name, delegate, ItemSchema::builtin())
    }

    pub fn with_schema(
        backend_name: impl Into<String>,
        delegate: Box<dyn Collector>,
        schema: Arc<ItemSchema>,
    ) -> Self {
        Self {
            backend_name: backend_name.into(),
            delegate,
            schema,
        }
    }

    /// Name of the backend this collector was created from.
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Record a state change on one or more push items.
    ///
    /// Each item is either a canonical record or a [`RichPushItem`](crate::items::RichPushItem);
    /// untyped `serde_json::Value`s are accepted if they are objects. All
    /// resulting records are validated before any of them reaches the backend,
    /// so an error here means nothing from the batch was recorded.
    pub fn update_push_items<I, T>(&mut self, items: I) -> Result<PushFuture, CollectorError>
    where
        I: IntoIterator<Item = T>,
        T: TryInto<PushItemInput>,
        CollectorError: From<T::Error>,
    {
        let mut input_count = 0;
        let mut records: Vec<PushItemRecord> = Vec::new();
        for item in items {
            let input: PushItemInput = item.try_into()?;
            input_count += 1;
            records.extend(input.into_records());
        }

        for (index, record) in records.iter().enumerate() {
            if let Err(violation) = self.schema.validate_record(record) {
                PushItemRejected {
                    backend: &self.backend_name,
                    index,
                    field: &violation.field,
                    reason: &violation.reason,
                }
                .log();
                return Err(CollectorError::SchemaViolation {
                    index,
                    field: violation.field,
                    reason: violation.reason,
                });
            }
        }

        PushItemsForwarded {
            backend: &self.backend_name,
            input_count,
            record_count: records.len(),
        }
        .log();

        Ok(PushFuture::from_backend(
            self.delegate.update_push_items(&records),
        ))
    }

    /// Collect `content` into `filename`, creating or overwriting it.
    pub fn attach_file<'a>(
        &mut self,
        filename: &str,
        content: impl Into<FileContent<'a>>,
    ) -> Result<PushFuture, CollectorError> {
        let content = content.into().as_bytes();
        self.log_file(filename, content.len(), false);
        Ok(PushFuture::from_backend(
            self.delegate.attach_file(filename, content),
        ))
    }

    /// Like [`attach_file`](CollectorProxy::attach_file), but appends to an existing file.
    pub fn append_file<'a>(
        &mut self,
        filename: &str,
        content: impl Into<FileContent<'a>>,
    ) -> Result<PushFuture, CollectorError> {
        let content = content.into().as_bytes();
        self.log_file(filename, content.len(), true);
        Ok(PushFuture::from_backend(
            self.delegate.append_file(filename, content),
        ))
    }

    fn log_file(&self, filename: &str, size: usize, append: bool) {
        FileForwarded {
            backend: &self.backend_name,
            filename,
            size,
            append,
        }
        .log();
    }
}

impl std::fmt::Debug for CollectorProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorProxy")
            .field("backend_name", &self.backend_name)
            .finish_non_exhaustive()
    }
}
