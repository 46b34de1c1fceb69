//! Fixtures and async test helpers

use banque_core::Document;
use serde_json::Value;
use std::time::Duration;

/// Turn a `json!({...})` object literal into a store document.
///
/// # Panics
/// If `value` is not a JSON object.
pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("document fixture must be a JSON object, got {other}"),
    }
}

/// Poll `condition` until it holds, yielding to spawned tasks in between.
///
/// Returns `false` after two seconds without success.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Install a test-friendly tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
