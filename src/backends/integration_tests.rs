#[cfg(test)]
mod integration_tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::backends::local::LocalCollector;
    use crate::config::Registry;
    use crate::errors::CollectorError;
    use crate::items::RichPushItem;

    /// Registry whose `local` backend writes into a temp dir, naming each
    /// run directory from a counter so every instance gets a distinct timestamp.
    fn registry_with_local_root(tmp: &TempDir) -> (Registry, std::path::PathBuf) {
        let root = tmp.path().join("artifacts");
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let factory_root = root.clone();
        registry
            .register_backend("local", move || {
                let counter = counter.clone();
                LocalCollector::with_root(factory_root.clone()).with_clock(move || {
                    format!("2025010100000{}", counter.fetch_add(1, Ordering::SeqCst))
                })
            })
            .unwrap();
        (registry, root)
    }

    fn read_jsonl(path: &std::path::Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_rich_items_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let (registry, root) = registry_with_local_root(&tmp);

        let mut collector = registry.get(None).unwrap();
        let first_batch = vec![RichPushItem::new("pkg-1.0.rpm", "PUSHED")
            .with_src("/staging/pkg-1.0.rpm")
            .with_dest("repo-a")
            .with_dest("repo-b")
            .with_sha256sum("e3b0c442")];
        collector.update_push_items(first_batch).unwrap().await.unwrap();
        collector
            .update_push_items(vec![json!({"filename": "notes.txt", "state": "PENDING"})])
            .unwrap()
            .await
            .unwrap();

        let lines = read_jsonl(&root.join("latest").join("pushitems.jsonl"));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["dest"], json!("repo-a"));
        assert_eq!(lines[1]["dest"], json!("repo-b"));
        assert_eq!(lines[0]["checksums"], json!({"sha256": "e3b0c442"}));
        assert_eq!(lines[2], json!({"filename": "notes.txt", "state": "PENDING"}));
    }

    #[tokio::test]
    async fn test_each_get_uses_its_own_run_directory() {
        let tmp = TempDir::new().unwrap();
        let (registry, root) = registry_with_local_root(&tmp);

        for i in 0..3 {
            let mut collector = registry.get(Some("local")).unwrap();
            collector
                .append_file("run.txt", format!("run {}", i).as_str())
                .unwrap()
                .await
                .unwrap();
        }

        for i in 0..3 {
            let run = root.join(format!("2025010100000{}", i));
            assert_eq!(
                fs::read_to_string(run.join("run.txt")).unwrap(),
                format!("run {}", i)
            );
        }
        assert_eq!(
            fs::read_to_string(root.join("latest").join("run.txt")).unwrap(),
            "run 2"
        );
    }

    #[tokio::test]
    async fn test_invalid_batch_leaves_no_trace() {
        let tmp = TempDir::new().unwrap();
        let (registry, root) = registry_with_local_root(&tmp);

        let mut collector = registry.get(None).unwrap();
        let err = collector
            .update_push_items(vec![
                json!({"filename": "ok", "state": "PUSHED"}),
                json!({"filename": "bad", "state": "PUSHED", "extra": true}),
            ])
            .unwrap_err();

        assert!(matches!(
            err,
            CollectorError::SchemaViolation { index: 1, ref field, .. } if field == "/extra"
        ));
        // Nothing was forwarded, so the lazy run directory was never created
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_dummy_backend_from_registry() {
        let registry = Registry::new();
        let mut collector = registry.get(Some("dummy")).unwrap();

        collector
            .update_push_items(vec![RichPushItem::new("f", "PUSHED")])
            .unwrap()
            .await
            .unwrap();
        collector.attach_file("somefile.txt", "hello").unwrap().await.unwrap();
    }
}
