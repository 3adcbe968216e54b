// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative schema for canonical push item records.
//!
//! The schema is a YAML document in the JSON Schema dialect, restricted to the
//! keywords push items actually need: `type` (single or list), `properties`,
//! `required` and `additionalProperties` (boolean or sub-schema). Everything
//! else in the document (`title`, `description`, `$schema`) is ignored.
//!
//! The bundled document is parsed once per process by [`ItemSchema::builtin`]
//! and never changes afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::ConfigError;

const BUILTIN_SCHEMA: &str = include_str!("pushitem.yaml");

static BUILTIN: OnceLock<Arc<ItemSchema>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JsonType {
    String,
    Object,
    Array,
    Number,
    Integer,
    Boolean,
    Null,
}

impl JsonType {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Null => value.is_null(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeSet {
    One(JsonType),
    Many(Vec<JsonType>),
}

impl TypeSet {
    fn as_slice(&self) -> &[JsonType] {
        match self {
            TypeSet::One(t) => std::slice::from_ref(t),
            TypeSet::Many(ts) => ts,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaNode {
    #[serde(rename = "type")]
    types: Option<TypeSet>,
    #[serde(default)]
    properties: BTreeMap<String, SchemaNode>,
    #[serde(default)]
    required: Vec<String>,
    additional_properties: Option<AdditionalProperties>,
}

/// Where and why a record failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path to the offending field, e.g. `/checksums/md5`
    pub field: String,
    pub reason: String,
}

impl SchemaNode {
    fn validate(&self, value: &Value, path: &str) -> Result<(), Violation> {
        if let Some(types) = &self.types {
            let allowed = types.as_slice();
            if !allowed.iter().any(|t| t.matches(value)) {
                return Err(Violation {
                    field: display_path(path),
                    reason: format!("{} is not of type {}", value, describe(allowed)),
                });
            }
        }

        match value {
            Value::Object(map) => self.validate_object(map, path),
            _ => Ok(()),
        }
    }

    fn validate_object(&self, map: &Map<String, Value>, path: &str) -> Result<(), Violation> {
        for name in &self.required {
            if !map.contains_key(name) {
                return Err(Violation {
                    field: format!("{}/{}", path, name),
                    reason: format!("'{}' is a required property", name),
                });
            }
        }

        for (key, field_value) in map {
            let field_path = format!("{}/{}", path, key);
            match self.properties.get(key) {
                Some(node) => node.validate(field_value, &field_path)?,
                None => match &self.additional_properties {
                    Some(AdditionalProperties::Allowed(false)) => {
                        return Err(Violation {
                            field: field_path,
                            reason: format!("additional property '{}' is not allowed", key),
                        });
                    }
                    Some(AdditionalProperties::Schema(node)) => {
                        node.validate(field_value, &field_path)?
                    }
                    Some(AdditionalProperties::Allowed(true)) | None => {}
                },
            }
        }

        Ok(())
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn describe(types: &[JsonType]) -> String {
    let names: Vec<String> = types
        .iter()
        .map(|t| format!("{:?}", t).to_lowercase())
        .collect();
    names.join(" or ")
}

/// Parsed push item schema.
#[derive(Debug, Clone)]
pub struct ItemSchema {
    root: SchemaNode,
}

impl ItemSchema {
    /// The schema bundled with this crate, parsed on first use.
    pub fn builtin() -> Arc<ItemSchema> {
        BUILTIN
            .get_or_init(|| {
                let schema = Self::from_yaml_str(BUILTIN_SCHEMA)
                    .expect("bundled push item schema must be valid");
                Arc::new(schema)
            })
            .clone()
    }

    /// Load a schema document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline schema>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let root: SchemaNode =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
                origin: origin.to_string(),
                source,
            })?;

        let describes_objects = root
            .types
            .as_ref()
            .map(|t| t.as_slice().contains(&JsonType::Object))
            .unwrap_or(false);
        if !describes_objects {
            return Err(ConfigError::Invalid {
                what: "push item schema",
                reason: format!("{} must declare 'type: object' at its root", origin),
            });
        }

        Ok(Self { root })
    }

    /// Check a single record, reporting the first violation found.
    pub fn validate(&self, record: &Value) -> Result<(), Violation> {
        self.root.validate(record, "")
    }

    /// Same as [`validate`](ItemSchema::validate) for a record already known to be a mapping.
    pub fn validate_record(&self, record: &Map<String, Value>) -> Result<(), Violation> {
        self.root.validate_object(record, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_schema_parses() {
        let schema = ItemSchema::builtin();
        assert!(schema.root.required.contains(&"filename".to_string()));
        assert!(schema.root.required.contains(&"state".to_string()));
    }

    #[test]
    fn test_validate_table_driven() {
        struct TestCase {
            name: &'static str,
            record: Value,
            expected: Result<(), &'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "minimal record",
                record: json!({"filename": "file1", "state": "PUSHED"}),
                expected: Ok(()),
            },
            TestCase {
                name: "fully populated record",
                record: json!({
                    "filename": "file1",
                    "state": "PUSHED",
                    "src": "/staging/file1",
                    "dest": "repo-1",
                    "checksums": {"md5": "abc", "sha256": "def"},
                    "origin": "RHBA-1234",
                    "build": "pkg-1.0-1",
                    "signing_key": "FD431D51",
                }),
                expected: Ok(()),
            },
            TestCase {
                name: "nullable fields set to null",
                record: json!({
                    "filename": "file1",
                    "state": "PENDING",
                    "src": null,
                    "dest": null,
                    "checksums": null,
                    "origin": null,
                    "build": null,
                    "signing_key": null,
                }),
                expected: Ok(()),
            },
            TestCase {
                name: "missing required fields",
                record: json!({"foo": "bar"}),
                expected: Err("/filename"),
            },
            TestCase {
                name: "missing state",
                record: json!({"filename": "file1"}),
                expected: Err("/state"),
            },
            TestCase {
                name: "unknown field",
                record: json!({"filename": "file1", "state": "PUSHED", "extra": 1}),
                expected: Err("/extra"),
            },
            TestCase {
                name: "wrong type for state",
                record: json!({"filename": "file1", "state": 3}),
                expected: Err("/state"),
            },
            TestCase {
                name: "dest must be a single destination",
                record: json!({"filename": "file1", "state": "PUSHED", "dest": ["a", "b"]}),
                expected: Err("/dest"),
            },
            TestCase {
                name: "checksum values must be strings",
                record: json!({"filename": "file1", "state": "PUSHED", "checksums": {"sha1": 5}}),
                expected: Err("/checksums/sha1"),
            },
            TestCase {
                name: "not an object",
                record: json!("file1"),
                expected: Err("/"),
            },
        ];

        let schema = ItemSchema::builtin();
        for test_case in test_cases {
            let result = schema.validate(&test_case.record);
            match (result, test_case.expected) {
                (Ok(()), Ok(())) => {}
                (Err(violation), Err(field)) => assert_eq!(
                    violation.field, field,
                    "Test case '{}': wrong field reported ({})",
                    test_case.name, violation.reason
                ),
                (actual, expected) => panic!(
                    "Test case '{}': expected {:?}, got {:?}",
                    test_case.name, expected, actual
                ),
            }
        }
    }

    #[test]
    fn test_schema_must_describe_objects() {
        let result = ItemSchema::from_yaml_str("type: string\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_invalid_yaml_reports_origin() {
        let err = ItemSchema::from_yaml_str("type: [object\n").unwrap_err();
        assert!(err.to_string().contains("<inline schema>"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(
            &path,
            "type: object\nrequired: [filename]\nadditionalProperties: true\n",
        )
        .unwrap();

        let schema = ItemSchema::load(&path).unwrap();
        assert!(schema.validate(&json!({"filename": "x", "anything": 1})).is_ok());
        assert!(schema.validate(&json!({"anything": 1})).is_err());
    }
}
