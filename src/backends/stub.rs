// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use crate::errors::BackendError;
use crate::items::PushItemRecord;
use crate::traits::{BackendResult, Collector, Completion};

type ErrorFactory = Box<dyn Fn() -> BackendError + Send>;

/// What a [`RecordingCollector`] hands back from every operation
#[derive(Default)]
pub enum ReturnMode {
    /// Plain, already-completed result
    #[default]
    Done,
    /// A future that succeeds with a non-unit value
    PendingOk,
    /// A future that fails
    PendingErr(ErrorFactory),
    /// Fail without returning a future at all
    Raise(ErrorFactory),
}

#[derive(Default)]
struct State {
    mode: ReturnMode,
    instances: usize,
    update_calls: usize,
    pushed: Vec<PushItemRecord>,
    files: Vec<(String, Vec<u8>, bool)>,
}

/// State shared between a test and every collector it creates
#[derive(Clone, Default)]
pub struct Shared(Arc<Mutex<State>>);

impl Shared {
    pub fn set_mode(&self, mode: ReturnMode) {
        self.0.lock().unwrap().mode = mode;
    }

    /// How many collectors have been constructed
    pub fn instances(&self) -> usize {
        self.0.lock().unwrap().instances
    }

    pub fn update_calls(&self) -> usize {
        self.0.lock().unwrap().update_calls
    }

    pub fn pushed(&self) -> Vec<PushItemRecord> {
        self.0.lock().unwrap().pushed.clone()
    }

    /// `(filename, content, appended)` for every file operation, in order
    pub fn files(&self) -> Vec<(String, Vec<u8>, bool)> {
        self.0.lock().unwrap().files.clone()
    }
}

/// A collector that records every call for later inspection
pub struct RecordingCollector {
    shared: Shared,
}

impl RecordingCollector {
    pub fn new(shared: Shared) -> Self {
        shared.0.lock().unwrap().instances += 1;
        Self { shared }
    }

    fn respond(&self) -> BackendResult {
        let state = self.shared.0.lock().unwrap();
        match &state.mode {
            ReturnMode::Done => Ok(Completion::Done),
            ReturnMode::PendingOk => Ok(Completion::pending(async {
                Ok::<_, BackendError>("abc")
            })),
            ReturnMode::PendingErr(make_error) => {
                let error = make_error();
                Ok(Completion::pending(async move { Err::<(), _>(error) }))
            }
            ReturnMode::Raise(make_error) => Err(make_error()),
        }
    }
}

impl Collector for RecordingCollector {
    fn update_push_items(&mut self, items: &[PushItemRecord]) -> BackendResult {
        {
            let mut state = self.shared.0.lock().unwrap();
            state.update_calls += 1;
            state.pushed.extend(items.iter().cloned());
        }
        self.respond()
    }

    fn attach_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        self.shared
            .0
            .lock()
            .unwrap()
            .files
            .push((filename.to_string(), content.to_vec(), false));
        self.respond()
    }

    fn append_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        self.shared
            .0
            .lock()
            .unwrap()
            .files
            .push((filename.to_string(), content.to_vec(), true));
        self.respond()
    }
}
