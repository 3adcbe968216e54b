// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::items::PushItemRecord;
use crate::traits::{BackendResult, Collector, Completion};

/// Backend that accepts everything and stores nothing.
///
/// Registered as `dummy`; useful for dry runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyCollector;

impl DummyCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for DummyCollector {
    fn update_push_items(&mut self, _items: &[PushItemRecord]) -> BackendResult {
        Ok(Completion::Done)
    }

    fn attach_file(&mut self, _filename: &str, _content: &[u8]) -> BackendResult {
        Ok(Completion::Done)
    }

    fn append_file(&mut self, _filename: &str, _content: &[u8]) -> BackendResult {
        Ok(Completion::Done)
    }
}
