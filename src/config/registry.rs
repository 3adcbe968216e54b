// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backends::dummy::DummyCollector;
use crate::backends::local::LocalCollector;
use crate::config::consts::{DUMMY_BACKEND, INITIAL_BACKEND};
use crate::config::CollectorConfig;
use crate::errors::CollectorError;
use crate::observability::messages::registry::{
    BackendRegistered, BackendResolved, BackendUnregistered, DefaultBackendChanged,
};
use crate::observability::messages::StructuredLog;
use crate::proxy::CollectorProxy;
use crate::schema::ItemSchema;
use crate::traits::Collector;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Zero-argument constructor for a backend.
///
/// Invoked once per [`Registry::get`]; instances are never shared.
#[derive(Clone)]
pub struct BackendFactory(Arc<dyn Fn() -> Box<dyn Collector> + Send + Sync>);

impl BackendFactory {
    pub fn new<F, C>(factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Collector + 'static,
    {
        Self(Arc::new(move || Box::new(factory()) as Box<dyn Collector>))
    }

    fn create(&self) -> Box<dyn Collector> {
        (self.0)()
    }
}

impl std::fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BackendFactory(..)")
    }
}

struct Inner {
    backends: HashMap<String, BackendFactory>,
    default: String,
}

/// Resolves backend names to fresh, proxied collector instances.
///
/// A new registry starts with two backends: `local` (also the default) and
/// `dummy`. Registries are independent of each other; [`Registry::global`]
/// is the one shared by the whole process.
///
/// # Examples
///
/// ```
/// use push_collector::config::Registry;
/// use push_collector::backends::dummy::DummyCollector;
///
/// let registry = Registry::new();
/// registry.register_backend("quiet", DummyCollector::new).unwrap();
/// registry.set_default(Some("quiet")).unwrap();
///
/// let collector = registry.get(None).unwrap();
/// assert_eq!(collector.backend_name(), "quiet");
/// ```
pub struct Registry {
    inner: RwLock<Inner>,
    schema: Arc<ItemSchema>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_schema(ItemSchema::builtin())
    }

    /// Registry whose collectors validate push items against `schema`.
    pub fn with_schema(schema: Arc<ItemSchema>) -> Self {
        let mut backends = HashMap::new();
        backends.insert(
            INITIAL_BACKEND.to_string(),
            BackendFactory::new(LocalCollector::new),
        );
        backends.insert(
            DUMMY_BACKEND.to_string(),
            BackendFactory::new(DummyCollector::new),
        );

        Self {
            inner: RwLock::new(Inner {
                backends,
                default: INITIAL_BACKEND.to_string(),
            }),
            schema,
        }
    }

    /// Build a registry from loaded configuration.
    ///
    /// `local.root` re-registers the local backend under that directory,
    /// `schema` replaces the bundled push item schema, and `default_backend`
    /// must name one of the built-in backends.
    pub fn from_config(cfg: &CollectorConfig) -> Result<Self, CollectorError> {
        let schema = match &cfg.schema {
            Some(path) => Arc::new(ItemSchema::load(path)?),
            None => ItemSchema::builtin(),
        };
        let registry = Self::with_schema(schema);

        if let Some(root) = &cfg.local.root {
            let root = root.clone();
            registry.register_backend(INITIAL_BACKEND, move || {
                LocalCollector::with_root(root.clone())
            })?;
        }

        if let Some(name) = &cfg.default_backend {
            registry.set_default(Some(name.as_str()))?;
        }

        Ok(registry)
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register, replace, or (with `None`) remove a backend.
    ///
    /// Removing the current default backend resets the default to `local`.
    pub fn register(
        &self,
        name: &str,
        factory: Option<BackendFactory>,
    ) -> Result<(), CollectorError> {
        if name.trim().is_empty() {
            return Err(CollectorError::InvalidArgument(format!(
                "backend name must not be empty, got: {:?}",
                name
            )));
        }

        let mut inner = self.write();
        match factory {
            Some(factory) => {
                let replaced = inner.backends.insert(name.to_string(), factory).is_some();
                BackendRegistered { name, replaced }.log();
            }
            None => {
                let reset_default = inner.default == name && name != INITIAL_BACKEND;
                if reset_default {
                    DefaultBackendChanged {
                        previous: name,
                        current: INITIAL_BACKEND,
                    }
                    .log();
                    inner.default = INITIAL_BACKEND.to_string();
                }
                if inner.backends.remove(name).is_some() {
                    BackendUnregistered {
                        name,
                        reset_default,
                    }
                    .log();
                }
            }
        }
        Ok(())
    }

    /// Shorthand for [`register`](Registry::register) with a closure.
    pub fn register_backend<F, C>(&self, name: &str, factory: F) -> Result<(), CollectorError>
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Collector + 'static,
    {
        self.register(name, Some(BackendFactory::new(factory)))
    }

    /// Shorthand for [`register`](Registry::register) with `None`.
    pub fn unregister(&self, name: &str) -> Result<(), CollectorError> {
        self.register(name, None)
    }

    /// Choose the backend used by `get(None)`; `None` restores `local`.
    pub fn set_default(&self, name: Option<&str>) -> Result<(), CollectorError> {
        let name = name.unwrap_or(INITIAL_BACKEND);

        let mut inner = self.write();
        if !inner.backends.contains_key(name) {
            return Err(CollectorError::UnknownBackend(name.to_string()));
        }
        if inner.default != name {
            DefaultBackendChanged {
                previous: &inner.default,
                current: name,
            }
            .log();
            inner.default = name.to_string();
        }
        Ok(())
    }

    pub fn default_backend(&self) -> String {
        self.read().default.clone()
    }

    /// Registered backend names, sorted.
    pub fn backend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().backends.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a collector from the named backend, or the default one.
    pub fn get(&self, name: Option<&str>) -> Result<CollectorProxy, CollectorError> {
        let (name, factory, is_default) = {
            let inner = self.read();
            let name = name.unwrap_or(inner.default.as_str()).to_string();
            let factory = inner
                .backends
                .get(&name)
                .cloned()
                .ok_or_else(|| CollectorError::UnknownBackend(name.clone()))?;
            let is_default = name == inner.default;
            (name, factory, is_default)
        };

        // The factory runs without the lock held so it may use the registry itself.
        let msg = BackendResolved {
            name: &name,
            is_default,
        };
        let span = msg.span("get_collector");
        let _guard = span.enter();
        msg.log();

        let backend = factory.create();
        Ok(CollectorProxy::with_schema(name, backend, self.schema.clone()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{RecordingCollector, Shared};
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_initial_state() {
        let registry = Registry::new();
        assert_eq!(registry.backend_names(), vec!["dummy", "local"]);
        assert_eq!(registry.default_backend(), "local");
        assert_eq!(registry.get(None).unwrap().backend_name(), "local");
    }

    #[tokio::test]
    async fn test_set_default() {
        let registry = Registry::new();
        let shared = Shared::default();
        let for_factory = shared.clone();

        registry
            .register_backend("my-collector", move || {
                RecordingCollector::new(for_factory.clone())
            })
            .unwrap();
        registry.set_default(Some("my-collector")).unwrap();

        let items = vec![
            json!({"filename": "file1", "state": "PENDING"}),
            json!({"filename": "file2", "state": "PENDING"}),
        ];
        registry
            .get(None)
            .unwrap()
            .update_push_items(items.clone())
            .unwrap()
            .await
            .unwrap();

        assert_eq!(shared.instances(), 1);
        let pushed: Vec<serde_json::Value> = shared
            .pushed()
            .into_iter()
            .map(serde_json::Value::Object)
            .collect();
        assert_eq!(pushed, items);
    }

    #[test]
    fn test_get_creates_fresh_instance_each_call() {
        let registry = Registry::new();
        let shared = Shared::default();
        let for_factory = shared.clone();
        registry
            .register_backend("counter", move || RecordingCollector::new(for_factory.clone()))
            .unwrap();

        for expected in 1..=3 {
            registry.get(Some("counter")).unwrap();
            assert_eq!(shared.instances(), expected);
        }
    }

    #[test]
    fn test_get_missing() {
        let registry = Registry::new();
        let err = registry.get(Some("not-registered")).unwrap_err();
        assert!(matches!(err, CollectorError::UnknownBackend(_)));
        assert!(err
            .to_string()
            .contains("No registered pushcollector backend: 'not-registered'"));
    }

    #[test]
    fn test_set_default_requires_registered_backend() {
        let registry = Registry::new();
        let err = registry.set_default(Some("nope")).unwrap_err();
        assert!(matches!(err, CollectorError::UnknownBackend(ref name) if name == "nope"));
        assert_eq!(registry.default_backend(), "local");
    }

    #[test]
    fn test_set_default_none_restores_initial() {
        let registry = Registry::new();
        registry.set_default(Some("dummy")).unwrap();
        assert_eq!(registry.default_backend(), "dummy");
        registry.set_default(None).unwrap();
        assert_eq!(registry.default_backend(), "local");
    }

    #[test]
    fn test_unregister_resets_default() {
        let registry = Registry::new();
        let shared = Shared::default();
        let for_factory = shared.clone();
        registry
            .register_backend("counter", move || RecordingCollector::new(for_factory.clone()))
            .unwrap();
        registry.set_default(Some("counter")).unwrap();

        registry.get(None).unwrap();
        registry.get(None).unwrap();
        assert_eq!(shared.instances(), 2);

        registry.register("counter", None).unwrap();

        let collector = registry.get(None).unwrap();
        assert_eq!(collector.backend_name(), "local");
        assert_eq!(shared.instances(), 2);
        assert!(registry.get(Some("counter")).is_err());
    }

    #[test]
    fn test_unregister_other_backend_keeps_default() {
        let registry = Registry::new();
        registry.set_default(Some("dummy")).unwrap();
        registry.register_backend("extra", DummyCollector::new).unwrap();
        registry.unregister("extra").unwrap();
        assert_eq!(registry.default_backend(), "dummy");

        // Removing an unknown name is not an error
        registry.unregister("never-registered").unwrap();
    }

    #[test]
    fn test_register_rejects_blank_names() {
        let registry = Registry::new();
        for name in ["", "   "] {
            let err = registry.register_backend(name, DummyCollector::new).unwrap_err();
            assert!(matches!(err, CollectorError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_registering_twice_is_idempotent() {
        let registry = Registry::new();
        registry.register_backend("quiet", DummyCollector::new).unwrap();
        registry.register_backend("quiet", DummyCollector::new).unwrap();
        assert_eq!(registry.backend_names(), vec!["dummy", "local", "quiet"]);
    }

    #[test]
    fn test_registries_are_isolated() {
        let first = Registry::new();
        let second = Registry::new();
        first.register_backend("only-first", DummyCollector::new).unwrap();
        first.set_default(Some("only-first")).unwrap();

        assert!(second.get(Some("only-first")).is_err());
        assert_eq!(second.default_backend(), "local");
    }

    #[test]
    fn test_global_registry_has_builtins() {
        let names = Registry::global().backend_names();
        assert!(names.contains(&"local".to_string()));
        assert!(names.contains(&"dummy".to_string()));
    }

    #[tokio::test]
    async fn test_from_config_roots_local_backend() {
        let tmp = TempDir::new().unwrap();
        let root: PathBuf = tmp.path().join("collected");
        let cfg = CollectorConfig {
            default_backend: None,
            schema: None,
            local: crate::config::LocalConfig {
                root: Some(root.clone()),
            },
        };

        let registry = Registry::from_config(&cfg).unwrap();
        let mut collector = registry.get(None).unwrap();
        collector.attach_file("hello.txt", "hi").unwrap().await.unwrap();

        let runs: Vec<_> = std::fs::read_dir(&root)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.is_dir() && path.file_name().unwrap() != "latest")
            .collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(
            std::fs::read_to_string(runs[0].join("hello.txt")).unwrap(),
            "hi"
        );
    }

    #[test]
    fn test_from_config_unknown_default() {
        let cfg = CollectorConfig {
            default_backend: Some("remote".to_string()),
            ..CollectorConfig::default()
        };
        let err = Registry::from_config(&cfg).err().unwrap();
        assert!(matches!(err, CollectorError::UnknownBackend(ref name) if name == "remote"));
    }
}
