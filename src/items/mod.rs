// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Push item representations.
//!
//! Callers hand the proxy either canonical records (plain JSON mappings) or
//! [`RichPushItem`]s, which may name several destinations. Both meet in
//! [`PushItemInput`], which the proxy resolves into canonical records exactly
//! once before validation.

use serde_json::{Map, Value};

use crate::errors::CollectorError;

/// A canonical push item: one JSON mapping per push-item state change.
///
/// Keys are kept sorted (serde_json's default map is ordered), which is what
/// makes serialized records deterministic.
pub type PushItemRecord = Map<String, Value>;

/// Push item as tracked by a publishing tool, prior to canonicalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichPushItem {
    pub name: String,
    pub state: String,
    pub src: Option<String>,
    pub dest: Vec<String>,
    pub md5sum: Option<String>,
    pub sha256sum: Option<String>,
    pub origin: Option<String>,
    pub build: Option<String>,
    pub signing_key: Option<String>,
}

impl RichPushItem {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            ..Self::default()
        }
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    pub fn with_dest(mut self, dest: impl Into<String>) -> Self {
        self.dest.push(dest.into());
        self
    }

    pub fn with_md5sum(mut self, md5sum: impl Into<String>) -> Self {
        self.md5sum = Some(md5sum.into());
        self
    }

    pub fn with_sha256sum(mut self, sha256sum: impl Into<String>) -> Self {
        self.sha256sum = Some(sha256sum.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    pub fn with_signing_key(mut self, signing_key: impl Into<String>) -> Self {
        self.signing_key = Some(signing_key.into());
        self
    }

    /// Expand into canonical records, one per destination.
    ///
    /// An item without destinations still yields a single record, with `dest`
    /// set to null. Empty checksums count as absent.
    pub fn to_records(&self) -> Vec<PushItemRecord> {
        let mut checksums = Map::new();
        for (key, sum) in [("md5", &self.md5sum), ("sha256", &self.sha256sum)] {
            if let Some(sum) = sum.as_deref().filter(|sum| !sum.is_empty()) {
                checksums.insert(key.to_string(), Value::from(sum));
            }
        }

        let mut base = Map::new();
        base.insert("filename".to_string(), Value::from(self.name.as_str()));
        base.insert("state".to_string(), Value::from(self.state.as_str()));
        base.insert("src".to_string(), optional(&self.src));
        base.insert("dest".to_string(), Value::Null);
        base.insert(
            "checksums".to_string(),
            if checksums.is_empty() {
                Value::Null
            } else {
                Value::Object(checksums)
            },
        );
        base.insert("origin".to_string(), optional(&self.origin));
        base.insert("build".to_string(), optional(&self.build));
        base.insert("signing_key".to_string(), optional(&self.signing_key));

        if self.dest.is_empty() {
            return vec![base];
        }

        self.dest
            .iter()
            .map(|dest| {
                let mut record = base.clone();
                record.insert("dest".to_string(), Value::from(dest.as_str()));
                record
            })
            .collect()
    }
}

fn optional(value: &Option<String>) -> Value {
    value
        .as_deref()
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// Anything accepted by `update_push_items`.
#[derive(Debug, Clone, PartialEq)]
pub enum PushItemInput {
    /// Already canonical; forwarded as-is (after validation)
    Record(PushItemRecord),
    Rich(RichPushItem),
}

impl PushItemInput {
    pub fn into_records(self) -> Vec<PushItemRecord> {
        match self {
            PushItemInput::Record(record) => vec![record],
            PushItemInput::Rich(item) => item.to_records(),
        }
    }
}

impl From<PushItemRecord> for PushItemInput {
    fn from(record: PushItemRecord) -> Self {
        PushItemInput::Record(record)
    }
}

impl From<RichPushItem> for PushItemInput {
    fn from(item: RichPushItem) -> Self {
        PushItemInput::Rich(item)
    }
}

/// Only JSON objects are push items; anything else is refused, not coerced.
impl TryFrom<Value> for PushItemInput {
    type Error = CollectorError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(record) => Ok(PushItemInput::Record(record)),
            other => Err(CollectorError::InvalidArgument(format!(
                "expected a push item mapping or rich push item, got: {}",
                other
            ))),
        }
    }
}
