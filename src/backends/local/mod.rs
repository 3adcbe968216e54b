// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Local filesystem backend.
//!
//! Writes everything under `<cwd>/artifacts/<timestamp>/`, one timestamped
//! run directory per collector instance, and keeps `<cwd>/artifacts/latest`
//! pointing at the newest run:
//!
//! ```text
//! artifacts/
//! ├── 20250314093000/
//! │   ├── pushitems.jsonl
//! │   └── some-file.txt
//! ├── 20250314101500/
//! │   └── pushitems.jsonl
//! └── latest -> 20250314101500
//! ```
//!
//! The run directory is created lazily, on the first write of any kind, so a
//! collector that is never used leaves no trace on disk.

mod jsonl;

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::config::consts::{
    ARTIFACTS_DIR, LATEST_LINK, MAX_RUN_DIR_SUFFIX, PUSH_ITEMS_FILE, RUN_DIR_TIMESTAMP_FORMAT,
};
use crate::errors::BackendError;
use crate::items::PushItemRecord;
use crate::observability::messages::local::{
    LatestPointerUpdated, LoggingToFile, RunDirectoryCreated,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{BackendResult, Collector, Completion};

/// Source of run directory names.
pub type Clock = Box<dyn Fn() -> String + Send>;

enum RunState {
    Uninitialized,
    /// Run directory exists but `latest` does not point at it yet
    Unlinked { dir: PathBuf, name: String },
    Active { dir: PathBuf },
}

#[derive(Clone, Copy)]
enum WriteMode {
    Truncate,
    Append,
}

/// Collector writing to the local filesystem; registered as `local`.
pub struct LocalCollector {
    root: PathBuf,
    clock: Clock,
    state: RunState,
    /// Files already announced via the "Logging to" message
    announced: HashSet<String>,
    /// Failure to resolve the working directory, reported on every write
    cwd_error: Option<(io::ErrorKind, String)>,
}

impl LocalCollector {
    /// Collector rooted at `artifacts/` under the current working directory.
    ///
    /// The working directory is captured now, not at first write.
    pub fn new() -> Self {
        Self::from_cwd(std::env::current_dir())
    }

    fn from_cwd(cwd: io::Result<PathBuf>) -> Self {
        match cwd {
            Ok(cwd) => Self::with_root(cwd.join(ARTIFACTS_DIR)),
            Err(e) => {
                let mut collector = Self::with_root(ARTIFACTS_DIR);
                collector.cwd_error = Some((e.kind(), e.to_string()));
                collector
            }
        }
    }

    /// Collector keeping its run directories under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clock: Box::new(local_timestamp),
            state: RunState::Uninitialized,
            announced: HashSet::new(),
            cwd_error: None,
        }
    }

    /// Replace the source of run directory names.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> String + Send + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The run directory, once something has been written.
    pub fn run_dir(&self) -> Option<&Path> {
        match &self.state {
            RunState::Uninitialized => None,
            RunState::Unlinked { dir, .. } | RunState::Active { dir } => Some(dir),
        }
    }

    /// Create the run directory on first use. A failed `latest` swap is
    /// retried on the next write; the directory itself is never recreated.
    fn ensure_run_dir(&mut self) -> Result<PathBuf, BackendError> {
        let (dir, name) = match &self.state {
            RunState::Active { dir } => return Ok(dir.clone()),
            RunState::Unlinked { dir, name } => (dir.clone(), name.clone()),
            RunState::Uninitialized => {
                if let Some((kind, message)) = &self.cwd_error {
                    return Err(BackendError::io(
                        &self.root,
                        io::Error::new(*kind, message.clone()),
                    ));
                }
                fs::create_dir_all(&self.root).map_err(|e| BackendError::io(&self.root, e))?;

                let (dir, name) = self.create_run_dir()?;
                self.state = RunState::Unlinked {
                    dir: dir.clone(),
                    name: name.clone(),
                };
                (dir, name)
            }
        };

        self.point_latest_at(&name)?;
        self.state = RunState::Active { dir: dir.clone() };
        Ok(dir)
    }

    /// Create a fresh run directory, suffixing `-001`, `-002`, ... when another
    /// collector already claimed this timestamp. Suffixes are zero-padded so
    /// names keep sorting in creation order.
    fn create_run_dir(&self) -> Result<(PathBuf, String), BackendError> {
        let timestamp = (self.clock)();

        for suffix in 0..=MAX_RUN_DIR_SUFFIX {
            let name = if suffix == 0 {
                timestamp.clone()
            } else {
                format!("{}-{:03}", timestamp, suffix)
            };
            let dir = self.root.join(&name);

            match fs::create_dir(&dir) {
                Ok(()) => {
                    RunDirectoryCreated { path: &dir, suffix }.log();
                    return Ok((dir, name));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(BackendError::io(dir, e)),
            }
        }

        Err(BackendError::io(
            self.root.join(&timestamp),
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "all {} run directory names for this timestamp are taken",
                    MAX_RUN_DIR_SUFFIX + 1
                ),
            ),
        ))
    }

    fn point_latest_at(&self, name: &str) -> Result<(), BackendError> {
        let link = self.root.join(LATEST_LINK);

        // symlink_metadata so that a dangling pointer is still found
        let replaced = match fs::symlink_metadata(&link) {
            Ok(_) => {
                fs::remove_file(&link).map_err(|e| BackendError::io(&link, e))?;
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(BackendError::io(&link, e)),
        };

        symlink_dir(Path::new(name), &link).map_err(|e| BackendError::io(&link, e))?;

        LatestPointerUpdated {
            link: &link,
            target: name,
            replaced,
        }
        .log();
        Ok(())
    }

    fn open_file(&mut self, basename: &str, mode: WriteMode) -> Result<File, BackendError> {
        check_basename(basename)?;
        let dir = self.ensure_run_dir()?;
        let path = dir.join(basename);

        let announce = !self.announced.contains(basename) && !path.exists();

        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Truncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let file = options.open(&path).map_err(|e| BackendError::io(&path, e))?;

        if announce {
            LoggingToFile { path: &path }.log();
        }
        self.announced.insert(basename.to_string());
        Ok(file)
    }

    fn write_file(&mut self, basename: &str, content: &[u8], mode: WriteMode) -> BackendResult {
        let mut file = self.open_file(basename, mode)?;
        file.write_all(content)
            .map_err(|e| BackendError::io(self.file_path(basename), e))?;
        Ok(Completion::Done)
    }

    fn file_path(&self, basename: &str) -> PathBuf {
        match &self.state {
            RunState::Unlinked { dir, .. } | RunState::Active { dir } => dir.join(basename),
            RunState::Uninitialized => self.root.join(basename),
        }
    }
}

impl Default for LocalCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for LocalCollector {
    fn update_push_items(&mut self, items: &[PushItemRecord]) -> BackendResult {
        let file = self.open_file(PUSH_ITEMS_FILE, WriteMode::Append)?;
        let path = self.file_path(PUSH_ITEMS_FILE);

        let mut writer = BufWriter::new(file);
        items
            .iter()
            .try_for_each(|item| jsonl::write_record(&mut writer, item))
            .and_then(|()| writer.flush())
            .map_err(|e| BackendError::io(path, e))?;
        Ok(Completion::Done)
    }

    fn attach_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        self.write_file(filename, content, WriteMode::Truncate)
    }

    fn append_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        self.write_file(filename, content, WriteMode::Append)
    }
}

/// Files live directly in the run directory; anything that would resolve
/// elsewhere is refused.
fn check_basename(basename: &str) -> Result<(), BackendError> {
    let mut components = Path::new(basename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(BackendError::io(
            basename,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "file names must not contain path separators or '..'",
            ),
        )),
    }
}

fn local_timestamp() -> String {
    chrono::Local::now()
        .format(RUN_DIR_TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
