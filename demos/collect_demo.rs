use std::env;

use push_collector::config::{load_config, CollectorConfig, Registry};
use push_collector::{BackendError, BackendResult, Collector, Completion, PushItemRecord, RichPushItem};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// A backend that prints what it receives and finishes asynchronously
struct EchoCollector;

impl Collector for EchoCollector {
    fn update_push_items(&mut self, items: &[PushItemRecord]) -> BackendResult {
        for item in items {
            println!("  push item: {}", serde_json::Value::Object(item.clone()));
        }
        let count = items.len();
        Ok(Completion::pending(async move {
            tokio::task::yield_now().await;
            Ok::<_, BackendError>(count)
        }))
    }

    fn attach_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        println!("  attach {} ({} bytes)", filename, content.len());
        Ok(Completion::Done)
    }

    fn append_file(&mut self, filename: &str, content: &[u8]) -> BackendResult {
        println!("  append {} ({} bytes)", filename, content.len());
        Ok(Completion::Done)
    }
}

/// Demo: pick a backend by configuration, then report through the same API
async fn run_collect_demo(cfg: CollectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== push-collector Demo ===\n");

    let registry = Registry::from_config(&cfg)?;
    registry.register_backend("echo", || EchoCollector)?;
    registry.set_default(Some("echo"))?;
    println!("Registered backends: {:?}", registry.backend_names());
    println!("Default backend: {}\n", registry.default_backend());

    let items = vec![
        RichPushItem::new("pkg-1.0-1.x86_64.rpm", "PUSHED")
            .with_src("/staging/pkg-1.0-1.x86_64.rpm")
            .with_dest("rhel-8-baseos")
            .with_dest("rhel-9-baseos")
            .with_sha256sum("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        RichPushItem::new("README", "SKIPPED"),
    ];

    for backend in [Some("local"), None] {
        let mut collector = registry.get(backend)?;
        println!("Using backend '{}'", collector.backend_name());

        collector.update_push_items(items.clone())?.await?;
        collector
            .update_push_items(vec![json!({"filename": "extra.iso", "state": "PENDING"})])?
            .await?;
        collector.attach_file("summary.txt", "2 items pushed\n")?.await?;
        collector.append_file("push.log", b"step 1 done\n")?.await?;
        println!();
    }

    // Schema violations are reported before anything reaches a backend
    let mut collector = registry.get(None)?;
    match collector.update_push_items(vec![json!({"foo": "bar"})]) {
        Err(err) => println!("Rejected invalid push item: {}", err),
        Ok(_) => println!("Unexpectedly accepted invalid push item"),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => CollectorConfig::default(),
    };

    if let Err(e) = run_collect_demo(cfg).await {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
